//! Shared key generation for storage backends.
//!
//! Key format: `{prefix}/{storage_name}`.

/// Build the object key for a stored file.
///
/// A trailing `/` on the prefix is ignored; an empty prefix yields the bare storage name.
pub fn object_key(prefix: &str, storage_name: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        storage_name.to_string()
    } else {
        format!("{}/{}", prefix, storage_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_joins_prefix_and_name() {
        assert_eq!(
            object_key("s3_data", "0b1e_a.txt"),
            "s3_data/0b1e_a.txt"
        );
    }

    #[test]
    fn test_object_key_trailing_slash_and_empty_prefix() {
        assert_eq!(object_key("s3_data/", "x_b.bin"), "s3_data/x_b.bin");
        assert_eq!(object_key("", "x_b.bin"), "x_b.bin");
    }
}
