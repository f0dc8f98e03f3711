use std::collections::HashMap;

use tributary_models::GroupInfo;

/// Field name prefix selecting a value from the group's metadata.
pub const TARGET_GROUP_METADATA_PREFIX: &str = "metadata.";
/// Field name prefix selecting a value from the group's tags.
pub const TARGET_GROUP_TAGS_PREFIX: &str = "tag.";

/// Requested field name → resolved value.
pub type FieldValues = HashMap<String, String>;

/// Resolve `target_fields` against the group context.
///
/// Every requested name becomes a key. Names without a known prefix, and
/// lookups that miss, resolve to `""`. Never fails. Returns `None` when
/// nothing was requested.
pub fn find_target_fields_in_group(
    target_fields: &[String],
    group: &GroupInfo,
) -> Option<FieldValues> {
    if target_fields.is_empty() {
        return None;
    }

    let mut values = HashMap::with_capacity(target_fields.len());
    for field in target_fields {
        let value = if let Some(key) = field.strip_prefix(TARGET_GROUP_METADATA_PREFIX) {
            group.metadata.get(key)
        } else if let Some(key) = field.strip_prefix(TARGET_GROUP_TAGS_PREFIX) {
            group.tags.get(key)
        } else {
            ""
        };
        values.insert(field.clone(), value.to_owned());
    }
    Some(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tributary_models::KeyValues;

    fn group() -> GroupInfo {
        GroupInfo::new(
            [("foo", "bar"), ("source", "/var/log/app.log")].into_iter().collect(),
            [("env", "prod"), ("foo", "tag-foo")].into_iter().collect::<KeyValues>(),
        )
    }

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_fields_yields_none() {
        assert!(find_target_fields_in_group(&[], &group()).is_none());
    }

    #[test]
    fn metadata_lookup() {
        let values = find_target_fields_in_group(&fields(&["metadata.foo"]), &group()).unwrap();
        assert_eq!(values["metadata.foo"], "bar");
    }

    #[test]
    fn tags_lookup() {
        let requested = fields(&["tag.env", "tag.foo"]);
        let values = find_target_fields_in_group(&requested, &group()).unwrap();
        assert_eq!(values["tag.env"], "prod");
        assert_eq!(values["tag.foo"], "tag-foo");
    }

    #[test]
    fn missing_tag_keeps_key() {
        let values = find_target_fields_in_group(&fields(&["tag.absent"]), &group()).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values.get("tag.absent").map(String::as_str), Some(""));
    }

    #[test]
    fn unknown_prefix_resolves_empty() {
        let requested = fields(&["foo", "content.foo", "metadata"]);
        let values = find_target_fields_in_group(&requested, &group()).unwrap();
        assert_eq!(values.len(), 3);
        assert!(values.values().all(|v| v.is_empty()));
    }

    #[test]
    fn duplicates_collapse() {
        let requested = fields(&["metadata.foo", "metadata.foo"]);
        let values = find_target_fields_in_group(&requested, &group()).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values["metadata.foo"], "bar");
    }

    #[test]
    fn prefix_alone_looks_up_empty_key() {
        let mut metadata = KeyValues::new();
        metadata.insert("", "blank");
        let group = GroupInfo::new(metadata, KeyValues::new());
        let values = find_target_fields_in_group(&fields(&["metadata.", "tag."]), &group).unwrap();
        assert_eq!(values["metadata."], "blank");
        assert_eq!(values["tag."], "");
    }
}
