//! `{{NAME}}` placeholder substitution for one service's deployment.
use crate::config::{DeployConfig, ServiceConfig};

/// Absolute install root.
pub const ROOT_DIR: &str = "ROOT_DIR";
/// Configured bind address.
pub const LISTEN_HOST: &str = "LISTEN_HOST";
/// Service name.
pub const NAME: &str = "NAME";
/// Service version.
pub const VERSION: &str = "VERSION";
/// Resolved exporter directory.
pub const EXPORTER_DIR: &str = "EXPORTER_DIR";
/// Path of the downloaded artifact; only known after the download step.
pub const DIST_FILE: &str = "DIST_FILE";

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Ordered, grow-only variable set with single-pass substitution.
///
/// A formatter is built fresh for each service and dropped when that
/// service's pipeline finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    variables: Vec<(String, String)>,
}

impl Formatter {
    /// Seed the variable set for `service`.
    ///
    /// `EXPORTER_DIR` is computed from `deploy.exporter_dir` using only the
    /// four variables defined before it.
    #[must_use]
    pub fn new(service: &ServiceConfig, deploy: &DeployConfig) -> Self {
        let mut formatter = Self {
            variables: Vec::new(),
        };
        formatter.add_variable(ROOT_DIR, deploy.root_dir.to_string_lossy());
        formatter.add_variable(LISTEN_HOST, deploy.listen_host.as_str());
        formatter.add_variable(NAME, service.name.as_str());
        formatter.add_variable(VERSION, service.version.as_str());
        let exporter_dir = formatter.format(&deploy.exporter_dir);
        formatter.add_variable(EXPORTER_DIR, exporter_dir);
        formatter
    }

    /// Add a variable, or update it in place if the name is already known.
    pub fn add_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.variables.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.variables.push((name, value)),
        }
    }

    /// Current value of `name`, if defined.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Variable names in insertion order.
    #[cfg(test)]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|(n, _)| n.as_str())
    }

    /// Replace every `{{NAME}}` whose name is defined.
    ///
    /// Unknown placeholders are copied verbatim. Substituted values are not
    /// scanned again, so a value containing `{{...}}` is emitted literally.
    #[must_use]
    pub fn format(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find(OPEN) {
            let (before, candidate) = rest.split_at(start);
            out.push_str(before);
            if let Some((value, remainder)) = self.resolve(candidate) {
                out.push_str(value);
                rest = remainder;
            } else {
                // Step past one brace so `{{{NAME}}` still resolves the inner token.
                out.push('{');
                rest = candidate.get(1..).unwrap_or_default();
            }
        }
        out.push_str(rest);
        out
    }

    /// If `candidate` starts with a known placeholder, return its value and
    /// the text after it.
    fn resolve<'t>(&self, candidate: &'t str) -> Option<(&str, &'t str)> {
        let inner = candidate.strip_prefix(OPEN)?;
        let (name, remainder) = inner.split_once(CLOSE)?;
        self.get(name).map(|value| (value, remainder))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn deploy(exporter_dir: &str) -> DeployConfig {
        DeployConfig {
            listen_host: "10.0.0.5".to_string(),
            root_dir: PathBuf::from("/srv/exporters"),
            exporter_dir: exporter_dir.to_string(),
            log_file: "/srv/exporters/{{NAME}}/current".to_string(),
        }
    }

    fn service(name: &str, version: &str) -> ServiceConfig {
        ServiceConfig {
            name: name.to_string(),
            version: version.to_string(),
            dist_url: String::new(),
            post_download: String::new(),
            install_bin: String::new(),
            args: String::new(),
        }
    }

    fn formatter() -> Formatter {
        Formatter::new(
            &service("node_exporter", "1.8.2"),
            &deploy("/srv/exporters/{{NAME}}-{{VERSION}}"),
        )
    }

    #[test]
    fn seeds_initial_variables_in_order() {
        let f = formatter();
        let names: Vec<&str> = f.names().collect();
        assert_eq!(names, [ROOT_DIR, LISTEN_HOST, NAME, VERSION, EXPORTER_DIR]);
        assert_eq!(f.get(ROOT_DIR), Some("/srv/exporters"));
        assert_eq!(f.get(LISTEN_HOST), Some("10.0.0.5"));
        assert_eq!(f.get(EXPORTER_DIR), Some("/srv/exporters/node_exporter-1.8.2"));
    }

    #[test]
    fn substitutes_known_placeholders() {
        let f = formatter();
        assert_eq!(
            f.format("--web.listen-address={{LISTEN_HOST}}:9100 --v={{VERSION}}"),
            "--web.listen-address=10.0.0.5:9100 --v=1.8.2"
        );
    }

    #[test]
    fn repeated_placeholders_are_all_replaced() {
        assert_eq!(formatter().format("{{NAME}}/{{NAME}}"), "node_exporter/node_exporter");
    }

    #[test]
    fn unknown_placeholders_are_left_verbatim() {
        let f = formatter();
        assert_eq!(f.format("{{DIST_FILE}} {{nope}} {{"), "{{DIST_FILE}} {{nope}} {{");
    }

    #[test]
    fn format_is_idempotent_without_known_placeholders() {
        let f = formatter();
        for text in ["plain", "{{UNKNOWN}}", "a {{B}} c }} {{", "{{{{X}}}}"] {
            let once = f.format(text);
            assert_eq!(f.format(&once), once, "not idempotent for {text:?}");
            assert_eq!(once, text);
        }
    }

    #[test]
    fn resolved_text_is_stable() {
        let f = formatter();
        let once = f.format("{{EXPORTER_DIR}}/run");
        assert_eq!(f.format(&once), once);
    }

    #[test]
    fn exporter_dir_cannot_see_dist_file() {
        let f = Formatter::new(
            &service("node_exporter", "1"),
            &deploy("/srv/{{DIST_FILE}}/{{NAME}}"),
        );
        assert_eq!(f.get(EXPORTER_DIR), Some("/srv/{{DIST_FILE}}/node_exporter"));
        assert_eq!(f.get(DIST_FILE), None);
    }

    #[test]
    fn added_variables_apply_to_later_formats() {
        let mut f = formatter();
        assert_eq!(f.format("tar xzf {{DIST_FILE}}"), "tar xzf {{DIST_FILE}}");
        f.add_variable(DIST_FILE, "/tmp/a.tgz");
        assert_eq!(f.format("tar xzf {{DIST_FILE}}"), "tar xzf /tmp/a.tgz");
    }

    #[test]
    fn add_variable_updates_in_place() {
        let mut f = formatter();
        f.add_variable(NAME, "renamed");
        assert_eq!(f.format("{{NAME}}"), "renamed");
        assert_eq!(f.names().filter(|n| *n == NAME).count(), 1);
        assert_eq!(f.names().nth(2), Some(NAME));
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let mut f = formatter();
        f.add_variable("A", "{{NAME}}");
        assert_eq!(f.format("{{A}}"), "{{NAME}}");
    }

    #[test]
    fn triple_brace_resolves_inner_token() {
        assert_eq!(formatter().format("{{{NAME}}}"), "{node_exporter}");
    }
}
