//! Decides where each rendered API template is written.
//!
//! Every template identifier maps to an output directory and a file suffix.
//! The file name defaults to the API tag (`PetApi.js`), but an ordered list of
//! substring rules can replace it with a fixed name so that one consolidated
//! file is produced for the whole API instead of one per tag.

use indexmap::IndexMap;

use crate::error::RoutingError;
use crate::transform::to_api_filename;

/// Where a template's output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingEntry {
    pub output_dir: String,
    pub suffix: String,
}

/// Replaces the per-tag file name when its predicate matches a template identifier.
#[derive(Debug, Clone, Copy)]
pub struct FilenameRule {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
    pub base_name: &'static str,
}

/// The override rules in priority order. First match wins.
pub fn default_filename_rules() -> Vec<FilenameRule> {
    vec![
        FilenameRule {
            name: "service_stub",
            matches: |id| id.contains("service_stub"),
            base_name: "Service_stub",
        },
        FilenameRule {
            name: "services",
            matches: |id| id.contains("services") && !id.contains("index"),
            base_name: "DefaultApiServices",
        },
        FilenameRule {
            name: "handlers",
            matches: |id| id.contains("handlers"),
            base_name: "DefaultHandlers",
        },
        FilenameRule {
            name: "api_controller",
            matches: |id| id.contains("api_controller"),
            base_name: "DefaultApiController",
        },
        FilenameRule {
            name: "controllers/index",
            matches: |id| id.contains("controllers/index"),
            base_name: "index",
        },
        FilenameRule {
            name: "services/index",
            matches: |id| id.contains("services/index"),
            base_name: "index",
        },
    ]
}

/// Registered API templates and the rules that name their output files.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    entries: IndexMap<String, RoutingEntry>,
    rules: Vec<FilenameRule>,
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::new(default_filename_rules())
    }
}

impl RoutingTable {
    pub fn new(rules: Vec<FilenameRule>) -> Self {
        Self {
            entries: IndexMap::new(),
            rules,
        }
    }

    /// Register a template with its output directory and suffix (including the dot).
    pub fn register(mut self, template_id: &str, output_dir: &str, suffix: &str) -> Self {
        let previous = self.entries.insert(
            template_id.to_string(),
            RoutingEntry {
                output_dir: output_dir.to_string(),
                suffix: suffix.to_string(),
            },
        );
        if previous.is_some() {
            log::warn!("routing entry for `{template_id}` registered twice; keeping the last one");
        }
        self
    }

    /// Registered template identifiers, in registration order.
    pub fn template_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entry(&self, template_id: &str) -> Result<&RoutingEntry, RoutingError> {
        self.entries
            .get(template_id)
            .ok_or_else(|| RoutingError::UnregisteredTemplate(template_id.to_string()))
    }

    pub fn suffix(&self, template_id: &str) -> Result<&str, RoutingError> {
        Ok(self.entry(template_id)?.suffix.as_str())
    }

    /// Fail on the first identifier without a routing entry.
    pub fn validate<'a, I>(&self, template_ids: I) -> Result<(), RoutingError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for id in template_ids {
            self.entry(id)?;
        }
        Ok(())
    }

    /// The first override rule matching the identifier, if any.
    pub fn matching_rule(&self, template_id: &str) -> Option<&FilenameRule> {
        self.rules.iter().find(|rule| (rule.matches)(template_id))
    }

    /// Whether the template renders one file for the whole API rather than one per tag.
    pub fn is_consolidated(&self, template_id: &str) -> bool {
        self.matching_rule(template_id).is_some()
    }

    /// File name without suffix: the rule's fixed name, or one derived from the tag.
    pub fn base_filename(&self, template_id: &str, api_tag: &str) -> Result<String, RoutingError> {
        self.entry(template_id)?;
        Ok(match self.matching_rule(template_id) {
            Some(rule) => rule.base_name.to_string(),
            None => to_api_filename(api_tag),
        })
    }

    /// File name (base + suffix) for a template rendered for `api_tag`.
    pub fn api_filename(&self, template_id: &str, api_tag: &str) -> Result<String, RoutingError> {
        let base = self.base_filename(template_id, api_tag)?;
        Ok(format!("{base}{}", self.suffix(template_id)?))
    }

    /// Full path of the file a template produces for `api_tag` under `output_dir`.
    pub fn resolve_output_path(
        &self,
        template_id: &str,
        api_tag: &str,
        output_dir: &str,
    ) -> Result<String, RoutingError> {
        let filename = self.api_filename(template_id, api_tag)?;
        let path = join_path(output_dir, &filename);
        log::debug!("routed `{template_id}` for tag `{api_tag}` to {path}");
        Ok(path)
    }

    /// Like [`resolve_output_path`](Self::resolve_output_path), using the
    /// template's registered output directory.
    pub fn resolve(&self, template_id: &str, api_tag: &str) -> Result<String, RoutingError> {
        let entry = self.entry(template_id)?;
        self.resolve_output_path(template_id, api_tag, &entry.output_dir)
    }
}

/// Join a directory and file name with `/`.
///
/// - `("src/controllers", "index.js")` → `"src/controllers/index.js"`
/// - `("", "package.json")` → `"package.json"`
pub fn join_path(dir: &str, file: &str) -> String {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        file.to_string()
    } else {
        format!("{dir}/{file}")
    }
}
