//! Descriptor merge.
//!
//! Reconciles an existing descriptor with the template's defaults. Every step
//! only fills what is absent, so merging an already merged descriptor again
//! with the same template and context changes nothing.

use std::path::{Path, PathBuf};

use crate::descriptor::{Bugs, Descriptor, Repository};
use crate::hosted::RepoCache;
use crate::naming;

/// Description used when none was authored. Never empty, so README templates
/// always have something to render.
pub const DESCRIPTION_PLACEHOLDER: &str = "\u{1F195}";

/// License used when neither the package nor the template names one.
pub const DEFAULT_LICENSE: &str = "GPL-3.0";

#[derive(Debug, Clone)]
pub struct MergeContext {
    /// Package directory; its last segment seeds the name.
    pub directory: PathBuf,
    pub remote_account: Option<String>,
    pub naming_prefixes: Vec<String>,
    /// Whether `directory` already holds a git repository.
    pub has_local_repo: bool,
    pub remote_host: String,
    pub registry_url: String,
}

impl MergeContext {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            remote_account: None,
            naming_prefixes: Vec::new(),
            has_local_repo: false,
            remote_host: "github.com".to_string(),
            registry_url: "https://npmjs.com/package/".to_string(),
        }
    }
}

/// Source of a local repository's configured `origin` remote.
pub trait OriginSource {
    fn origin_url(&self, dir: &Path) -> Option<String>;
}

/// Origin source for callers that never have a local repository.
pub struct NoOrigin;

impl OriginSource for NoOrigin {
    fn origin_url(&self, _dir: &Path) -> Option<String> {
        None
    }
}

/// Merge `template` defaults into `existing`.
pub fn merge(
    mut existing: Descriptor,
    template: &Descriptor,
    ctx: &MergeContext,
    origin: &dyn OriginSource,
    repos: &mut RepoCache,
) -> Descriptor {
    if existing.name.is_none() {
        existing.name = naming::derive_name(&ctx.directory, &ctx.naming_prefixes);
    }

    if existing.description.is_none() {
        existing.description = Some(DESCRIPTION_PLACEHOLDER.to_string());
    }

    if existing.author.is_none() {
        existing.author = template.author.clone();
    }

    if existing.license.is_none() {
        existing.license = Some(
            template
                .license
                .clone()
                .unwrap_or_else(|| DEFAULT_LICENSE.to_string()),
        );
    }

    if let Some(defaults) = &template.scripts {
        let scripts = existing.scripts.get_or_insert_with(Default::default);
        for (key, value) in defaults {
            if !scripts.contains_key(key) {
                scripts.insert(key.clone(), value.clone());
            }
        }
    }

    if let Some(defaults) = &template.dev_dependencies {
        let deps = existing.dev_dependencies.get_or_insert_with(Default::default);
        for (key, value) in defaults {
            if !deps.contains_key(key) {
                deps.insert(key.clone(), value.clone());
            }
        }
    }

    if let Some(defaults) = &template.config {
        let config = existing.config.get_or_insert_with(Default::default);
        for (key, value) in defaults {
            if !config.contains_key(key) {
                config.insert(key.clone(), value.clone());
            }
        }
    }

    if existing.repository.is_none() {
        existing.repository = Some(resolve_repository(existing.name.as_deref(), ctx, origin));
    }

    if let Some(url) = existing.repository_url().map(str::to_string) {
        if let Some(repo) = repos.resolve(&url) {
            if existing.bugs.is_none() {
                existing.bugs = Some(Bugs::Url(repo.bugs_url()));
            }
            if existing.homepage.is_none() {
                if let Some(name) = existing.name.as_deref() {
                    existing.homepage = Some(format!("{}{}", ctx.registry_url, name));
                }
            }
        }
    }

    existing
}

fn resolve_repository(
    name: Option<&str>,
    ctx: &MergeContext,
    origin: &dyn OriginSource,
) -> Repository {
    let mut repository = Repository {
        kind: Some("git".to_string()),
        url: None,
        ..Repository::default()
    };

    if ctx.has_local_repo {
        repository.url = origin
            .origin_url(&ctx.directory)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
    }

    if repository.url.is_none() {
        if let (Some(account), Some(name)) = (ctx.remote_account.as_deref(), name) {
            let slug = naming::repo_slug(name);
            if !account.is_empty() && !slug.is_empty() {
                repository.url = Some(format!(
                    "https://{}/{}/{}.git",
                    ctx.remote_host, account, slug
                ));
            }
        }
    }

    repository
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Author;
    use indexmap::IndexMap;
    use serde_json::json;

    struct FixedOrigin(&'static str);

    impl OriginSource for FixedOrigin {
        fn origin_url(&self, _dir: &Path) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    fn ctx(dir: &str) -> MergeContext {
        MergeContext::new(dir)
    }

    fn run(existing: Descriptor, template: &Descriptor, ctx: &MergeContext) -> Descriptor {
        merge(existing, template, ctx, &NoOrigin, &mut RepoCache::new())
    }

    fn map(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn name_is_derived_only_when_absent() {
        let mut context = ctx("/x/delucis-my-tool");
        context.naming_prefixes = vec!["delucis".to_string()];

        let merged = run(Descriptor::default(), &Descriptor::default(), &context);
        assert_eq!(merged.name.as_deref(), Some("@delucis/my-tool"));

        let named = Descriptor {
            name: Some("kept".to_string()),
            ..Descriptor::default()
        };
        let merged = run(named, &Descriptor::default(), &context);
        assert_eq!(merged.name.as_deref(), Some("kept"));
    }

    #[test]
    fn description_gets_placeholder() {
        let merged = run(Descriptor::default(), &Descriptor::default(), &ctx("/x/tool"));
        assert_eq!(merged.description.as_deref(), Some(DESCRIPTION_PLACEHOLDER));
    }

    #[test]
    fn author_is_copied_whole() {
        let template = Descriptor {
            author: Some(Author::Name("Ada".to_string())),
            ..Descriptor::default()
        };
        let merged = run(Descriptor::default(), &template, &ctx("/x/tool"));
        assert_eq!(merged.author, Some(Author::Name("Ada".to_string())));

        let existing = Descriptor {
            author: Some(Author::Name("Grace".to_string())),
            ..Descriptor::default()
        };
        let merged = run(existing, &template, &ctx("/x/tool"));
        assert_eq!(merged.author, Some(Author::Name("Grace".to_string())));
    }

    #[test]
    fn license_from_template_or_default() {
        let template = Descriptor {
            license: Some("MIT".to_string()),
            ..Descriptor::default()
        };
        let merged = run(Descriptor::default(), &template, &ctx("/x/tool"));
        assert_eq!(merged.license.as_deref(), Some("MIT"));

        let merged = run(Descriptor::default(), &Descriptor::default(), &ctx("/x/tool"));
        assert_eq!(merged.license.as_deref(), Some(DEFAULT_LICENSE));
    }

    #[test]
    fn mappings_merge_per_key_and_existing_wins() {
        let existing = Descriptor {
            scripts: Some(map(&[("test", "node test.js")])),
            config: Some(json!({ "port": 1 }).as_object().unwrap().clone()),
            ..Descriptor::default()
        };
        let template = Descriptor {
            scripts: Some(map(&[("test", "tape test/*.js"), ("lint", "standard")])),
            dev_dependencies: Some(map(&[("tape", "^5.0.0")])),
            config: Some(json!({ "port": 8080, "host": "localhost" }).as_object().unwrap().clone()),
            ..Descriptor::default()
        };

        let merged = run(existing, &template, &ctx("/x/tool"));

        assert_eq!(
            merged.scripts,
            Some(map(&[("test", "node test.js"), ("lint", "standard")]))
        );
        assert_eq!(merged.dev_dependencies, Some(map(&[("tape", "^5.0.0")])));
        let config = merged.config.unwrap();
        assert_eq!(config["port"], json!(1));
        assert_eq!(config["host"], json!("localhost"));
    }

    #[test]
    fn empty_existing_value_still_counts_as_present() {
        let existing = Descriptor {
            scripts: Some(map(&[("test", "")])),
            ..Descriptor::default()
        };
        let template = Descriptor {
            scripts: Some(map(&[("test", "tape")])),
            ..Descriptor::default()
        };
        let merged = run(existing, &template, &ctx("/x/tool"));
        assert_eq!(merged.scripts, Some(map(&[("test", "")])));
    }

    #[test]
    fn mapping_not_created_without_template_mapping() {
        let merged = run(Descriptor::default(), &Descriptor::default(), &ctx("/x/tool"));
        assert!(merged.scripts.is_none());
        assert!(merged.dev_dependencies.is_none());
        assert!(merged.config.is_none());
    }

    #[test]
    fn repository_synthesized_from_account_and_slug() {
        let mut context = ctx("/x/tool");
        context.remote_account = Some("octo".to_string());
        let existing = Descriptor {
            name: Some("My Cool! Tool".to_string()),
            ..Descriptor::default()
        };

        let merged = run(existing, &Descriptor::default(), &context);
        let repository = merged.repository.as_ref().unwrap();
        assert_eq!(repository.kind.as_deref(), Some("git"));
        assert_eq!(
            repository.url.as_deref(),
            Some("https://github.com/octo/My-Cool-Tool.git")
        );
        assert_eq!(
            merged.bugs,
            Some(Bugs::Url("https://github.com/octo/My-Cool-Tool/issues".to_string()))
        );
        assert_eq!(
            merged.homepage.as_deref(),
            Some("https://npmjs.com/package/My Cool! Tool")
        );
    }

    #[test]
    fn local_origin_is_trimmed_and_preferred() {
        let mut context = ctx("/x/tool");
        context.has_local_repo = true;
        context.remote_account = Some("octo".to_string());

        let merged = merge(
            Descriptor::default(),
            &Descriptor::default(),
            &context,
            &FixedOrigin("git@github.com:someone/else.git\n"),
            &mut RepoCache::new(),
        );

        assert_eq!(
            merged.repository_url(),
            Some("git@github.com:someone/else.git")
        );
        assert_eq!(
            merged.bugs,
            Some(Bugs::Url("https://github.com/someone/else/issues".to_string()))
        );
    }

    #[test]
    fn empty_local_origin_falls_back_to_account() {
        let mut context = ctx("/x/tool");
        context.has_local_repo = true;
        context.remote_account = Some("octo".to_string());

        let merged = merge(
            Descriptor::default(),
            &Descriptor::default(),
            &context,
            &FixedOrigin("  "),
            &mut RepoCache::new(),
        );
        assert_eq!(merged.repository_url(), Some("https://github.com/octo/tool.git"));
    }

    #[test]
    fn no_url_key_without_origin_or_account() {
        let merged = run(Descriptor::default(), &Descriptor::default(), &ctx("/x/tool"));
        let repository = merged.repository.as_ref().unwrap();
        assert!(repository.url.is_none());
        assert!(merged.bugs.is_none());
        assert!(merged.homepage.is_none());

        let value: serde_json::Value =
            serde_json::from_str(&merged.to_pretty_json().unwrap()).unwrap();
        assert_eq!(value["repository"], json!({ "type": "git" }));
    }

    #[test]
    fn existing_repository_is_left_alone() {
        let mut context = ctx("/x/tool");
        context.remote_account = Some("octo".to_string());
        let existing = Descriptor {
            repository: Some(Repository {
                kind: Some("svn".to_string()),
                url: None,
                ..Repository::default()
            }),
            ..Descriptor::default()
        };

        let merged = run(existing, &Descriptor::default(), &context);
        assert_eq!(merged.repository.as_ref().unwrap().kind.as_deref(), Some("svn"));
        assert!(merged.repository_url().is_none());
    }

    #[test]
    fn unrecognized_url_skips_derived_fields() {
        let existing = Descriptor {
            repository: Some(Repository {
                kind: Some("git".to_string()),
                url: Some("https://example.com/octo/tool.git".to_string()),
                ..Repository::default()
            }),
            ..Descriptor::default()
        };

        let merged = run(existing, &Descriptor::default(), &ctx("/x/tool"));
        assert!(merged.bugs.is_none());
        assert!(merged.homepage.is_none());
    }

    #[test]
    fn present_bugs_and_homepage_are_kept() {
        let existing = Descriptor {
            repository: Some(Repository {
                kind: Some("git".to_string()),
                url: Some("github:octo/tool".to_string()),
                ..Repository::default()
            }),
            bugs: Some(Bugs::Url("https://tracker.example/tool".to_string())),
            homepage: Some("https://tool.example".to_string()),
            ..Descriptor::default()
        };

        let merged = run(existing.clone(), &Descriptor::default(), &ctx("/x/tool"));
        assert_eq!(merged.bugs, existing.bugs);
        assert_eq!(merged.homepage, existing.homepage);
    }

    #[test]
    fn merge_is_idempotent() {
        let mut context = ctx("/x/octo-tool");
        context.remote_account = Some("octo".to_string());
        context.naming_prefixes = vec!["octo".to_string()];
        let template = Descriptor {
            license: Some("MIT".to_string()),
            author: Some(Author::Name("Ada".to_string())),
            scripts: Some(map(&[("test", "tape")])),
            dev_dependencies: Some(map(&[("tape", "^5.0.0")])),
            config: Some(json!({ "a": { "b": 1 } }).as_object().unwrap().clone()),
            ..Descriptor::default()
        };

        let mut cache = RepoCache::new();
        let once = merge(Descriptor::default(), &template, &context, &NoOrigin, &mut cache);
        let twice = merge(once.clone(), &template, &context, &NoOrigin, &mut cache);
        assert_eq!(once, twice);
        assert_eq!(once.name.as_deref(), Some("@octo/tool"));
        assert_eq!(once.repository_url(), Some("https://github.com/octo/octo-tool.git"));
    }
}
