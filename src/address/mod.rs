mod canonical;

pub use canonical::{CanonicalAddressNormalizer, NormalizeError, DEFAULT_MAX_LEN};
