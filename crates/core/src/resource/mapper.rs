//! Object key → resource mapping.

use super::types::{Resource, ResourceType};

/// Separator between key segments.
pub const KEY_SEPARATOR: char = '/';

/// Map an object key to a resource.
///
/// The name is everything after the last `/` (the whole key when there is
/// none). Keys ending in `/` are folders, so a folder's name is empty.
#[must_use]
pub fn key_to_resource(key: &str) -> Resource {
    let name = key
        .rfind(KEY_SEPARATOR)
        .map_or(key, |idx| &key[idx + KEY_SEPARATOR.len_utf8()..]);
    let kind = if key.ends_with(KEY_SEPARATOR) {
        ResourceType::Folder
    } else {
        ResourceType::File
    };

    Resource::new(key, name, kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_key_is_file_named_after_itself() {
        let resource = key_to_resource("my-resource.txt");
        assert_eq!(resource.id(), "my-resource.txt");
        assert_eq!(resource.name(), "my-resource.txt");
        assert_eq!(resource.kind(), ResourceType::File);
    }

    #[test]
    fn test_nested_key_uses_basename() {
        let resource = key_to_resource("reports/2024/q1.pdf");
        assert_eq!(resource.name(), "q1.pdf");
        assert_eq!(resource.kind(), ResourceType::File);
    }

    #[test]
    fn test_trailing_slash_is_folder() {
        let resource = key_to_resource("a/");
        assert_eq!(resource.id(), "a/");
        assert_eq!(resource.name(), "");
        assert_eq!(resource.kind(), ResourceType::Folder);
    }

    #[test]
    fn test_empty_key() {
        let resource = key_to_resource("");
        assert_eq!(resource.name(), "");
        assert_eq!(resource.kind(), ResourceType::File);
    }

    proptest! {
        #[test]
        fn prop_name_without_separator_is_key(key in "[^/]*") {
            let resource = key_to_resource(&key);
            prop_assert_eq!(resource.name(), key.as_str());
        }

        #[test]
        fn prop_name_is_text_after_last_separator(
            head in ".*",
            tail in "[^/]*",
        ) {
            let key = format!("{head}/{tail}");
            let resource = key_to_resource(&key);
            prop_assert_eq!(resource.name(), tail.as_str());
        }

        #[test]
        fn prop_folder_iff_trailing_separator(key in ".*") {
            let expected = if key.ends_with('/') {
                ResourceType::Folder
            } else {
                ResourceType::File
            };
            prop_assert_eq!(key_to_resource(&key).kind(), expected);
        }

        #[test]
        fn prop_id_is_key(key in ".*") {
            let resource = key_to_resource(&key);
            prop_assert_eq!(resource.id(), key.as_str());
        }
    }
}
