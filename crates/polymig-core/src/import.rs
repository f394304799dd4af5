use std::collections::HashMap;
use std::path::Path;

use crate::error::ImportError;
use crate::model::{ExternalNetwork, NetworkAccessPolicy};

const NAMESPACE_CATEGORY: &str = "namespace";
const EXTERNAL_NETWORK_CATEGORY: &str = "externalnetwork";
const NETWORK_ACCESS_POLICY_CATEGORY: &str = "networkaccesspolicy";

/// The import document's top-level shape: a label plus a category-name to
/// item-list map. `namespace` entries are accepted but discarded — this
/// kernel has no namespace object of its own to populate.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ImportDocument {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub data: HashMap<String, Vec<serde_yaml::Value>>,
}

#[derive(Debug, Default, Clone)]
pub struct ImportResult {
    pub external_networks: Vec<ExternalNetwork>,
    pub network_access_policies: Vec<NetworkAccessPolicy>,
}

enum Category {
    ExternalNetwork,
    NetworkAccessPolicy,
}

fn registry() -> HashMap<&'static str, Category> {
    HashMap::from([
        (EXTERNAL_NETWORK_CATEGORY, Category::ExternalNetwork),
        (NETWORK_ACCESS_POLICY_CATEGORY, Category::NetworkAccessPolicy),
    ])
}

fn describe_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "boolean",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "sequence",
        serde_yaml::Value::Mapping(_) => "mapping",
        serde_yaml::Value::Tagged(_) => "tagged value",
    }
}

/// Every known category decodes from a mapping (field name to value). An
/// item that isn't one can never resolve to the target struct, regardless
/// of which fields it's missing — that's a distinct, fatal precondition
/// from a field-level decode failure (`BadItem`).
fn require_mapping(item: &serde_yaml::Value, category: &str) -> Result<(), ImportError> {
    if item.is_mapping() {
        Ok(())
    } else {
        Err(ImportError::UnidentifiableObject {
            category: category.to_string(),
            reason: format!("expected a mapping, found a {}", describe_kind(item)),
        })
    }
}

/// Decodes every category in `doc.data` except `namespace` (dropped up
/// front). An empty category name is fatal; a category this registry
/// doesn't recognize is logged and skipped rather than guessed at.
pub fn import_from_document(doc: &ImportDocument) -> Result<ImportResult, ImportError> {
    let registry = registry();
    let mut result = ImportResult::default();

    for (category, items) in &doc.data {
        if category.eq_ignore_ascii_case(NAMESPACE_CATEGORY) {
            continue;
        }
        if category.is_empty() {
            return Err(ImportError::EmptyIdentity(category.clone()));
        }

        match registry.get(category.as_str()) {
            Some(Category::ExternalNetwork) => {
                for item in items {
                    require_mapping(item, category)?;
                    let en: ExternalNetwork = serde_yaml::from_value(item.clone()).map_err(|source| {
                        ImportError::BadItem { category: category.clone(), source }
                    })?;
                    result.external_networks.push(en);
                }
            }
            Some(Category::NetworkAccessPolicy) => {
                for item in items {
                    require_mapping(item, category)?;
                    let np: NetworkAccessPolicy = serde_yaml::from_value(item.clone()).map_err(|source| {
                        ImportError::BadItem { category: category.clone(), source }
                    })?;
                    result.network_access_policies.push(np);
                }
            }
            None => {
                tracing::warn!(category = %category, "skipping unrecognized import category");
            }
        }
    }

    Ok(result)
}

pub fn import_from_file(path: &Path) -> Result<ImportResult, ImportError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|source| ImportError::Io { path: path.to_path_buf(), source })?;
    let doc: ImportDocument = serde_yaml::from_str(&contents)?;
    import_from_document(&doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
label: demo
data:
  namespace:
    - name: /foo
  externalnetwork:
    - name: office
      associatedTags: ["app=bar"]
      entries: ["10.0.0.0/24"]
      servicePorts: ["tcp/80"]
  networkaccesspolicy:
    - name: np1
      action: allow
      applyPolicyMode: bidirectional
      subject: [["app=foo"]]
      object: [["app=bar"]]
"#;

    #[test]
    fn decodes_known_categories_and_drops_namespace() {
        let doc: ImportDocument = serde_yaml::from_str(DOC).unwrap();
        let result = import_from_document(&doc).unwrap();
        assert_eq!(result.external_networks.len(), 1);
        assert_eq!(result.external_networks[0].name, "office");
        assert_eq!(result.network_access_policies.len(), 1);
        assert_eq!(result.network_access_policies[0].name, "np1");
    }

    #[test]
    fn unrecognized_category_is_skipped_not_fatal() {
        let doc: ImportDocument = serde_yaml::from_str(
            r#"
label: demo
data:
  processingunit:
    - name: pu1
"#,
        )
        .unwrap();
        let result = import_from_document(&doc).unwrap();
        assert!(result.external_networks.is_empty());
        assert!(result.network_access_policies.is_empty());
    }

    #[test]
    fn non_mapping_item_is_unidentifiable() {
        let doc: ImportDocument = serde_yaml::from_str(
            r#"
label: demo
data:
  externalnetwork:
    - "just a string, not a mapping"
"#,
        )
        .unwrap();
        let err = import_from_document(&doc).unwrap_err();
        assert!(matches!(err, ImportError::UnidentifiableObject { .. }));
    }

    #[test]
    fn empty_category_name_is_fatal() {
        let doc: ImportDocument = serde_yaml::from_str(
            r#"
label: demo
data:
  "":
    - name: x
"#,
        )
        .unwrap();
        assert!(import_from_document(&doc).is_err());
    }
}
