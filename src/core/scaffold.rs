//! Boilerplate files copied from the template directory.
//!
//! Destinations are created with `create_new`, so an existing file is never
//! touched, even if it appears between the existence check and the copy.

use serde::Serialize;
use serde_json::Value;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;

use crate::descriptor::Descriptor;
use crate::error::{Error, Result};
use crate::hosted::RepoCache;
use crate::utils::{io, template};

pub const README_FILE: &str = "README.md";

/// One template file and where it lands in the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boilerplate {
    pub source: String,
    pub dest: String,
    pub label: Option<&'static str>,
}

impl Boilerplate {
    fn same(name: &str) -> Self {
        Self::renamed(name, name)
    }

    fn renamed(source: &str, dest: &str) -> Self {
        Self {
            source: source.to_string(),
            dest: dest.to_string(),
            label: None,
        }
    }

    fn dotted(name: &str) -> Self {
        Self::renamed(name, &format!(".{}", name))
    }

    fn message(&self) -> String {
        match self.label {
            Some(label) => format!("Copied {}", label),
            None => format!("Copied \u{201C}{}\u{201D}", self.dest),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileStatus {
    Copied,
    Generated,
    Skipped,
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub path: String,
    #[serde(flatten)]
    pub status: FileStatus,
}

/// Files every package receives. The license text is picked by the
/// descriptor's license identifier.
pub fn boilerplate_for(descriptor: &Descriptor) -> Vec<Boilerplate> {
    let mut files = Vec::new();

    if let Some(license) = descriptor.license.as_deref() {
        files.push(Boilerplate::renamed(&format!("LICENSE-{}", license), "LICENSE"));
    }

    files.push(Boilerplate::dotted("gitignore"));
    files.push(Boilerplate::dotted("travis.yml"));
    files.push(Boilerplate::same("index.js"));
    files.push(Boilerplate::renamed("test.js", "test/test.js"));
    files.push(Boilerplate {
        label: Some("Code of Conduct"),
        ..Boilerplate::same("CODE_OF_CONDUCT.md")
    });

    files
}

/// Copy `item` unless its destination exists. Returns whether it was copied.
pub fn copy_if_absent(template_dir: &Path, pkg_dir: &Path, item: &Boilerplate) -> Result<bool> {
    let source = template_dir.join(&item.source);
    let dest = pkg_dir.join(&item.dest);

    if dest.exists() {
        return Ok(false);
    }

    let mut reader = match File::open(&source) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::template_file_not_found(source.display().to_string()))
        }
        Err(e) => {
            return Err(Error::internal_io(
                e.to_string(),
                Some(format!("open {}", source.display())),
            ))
        }
    };

    io::ensure_parent_dir(&dest, &format!("create parent of {}", item.dest))?;

    let mut writer = match OpenOptions::new().write(true).create_new(true).open(&dest) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => {
            return Err(Error::internal_io(
                e.to_string(),
                Some(format!("create {}", dest.display())),
            ))
        }
    };

    std::io::copy(&mut reader, &mut writer).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("copy {}", item.source)))
    })?;

    Ok(true)
}

/// Copy every item, logging each result. Failures are reported, not fatal.
pub fn copy_boilerplate(
    template_dir: &Path,
    pkg_dir: &Path,
    items: &[Boilerplate],
) -> Vec<FileOutcome> {
    items
        .iter()
        .map(|item| {
            let status = match copy_if_absent(template_dir, pkg_dir, item) {
                Ok(true) => {
                    crate::tty::status(&item.message());
                    FileStatus::Copied
                }
                Ok(false) => {
                    crate::log_status!("scaffold", "{} exists, leaving it alone", item.dest);
                    FileStatus::Skipped
                }
                Err(err) => {
                    crate::log_status!(
                        "scaffold",
                        "Could not copy {}: {}",
                        item.dest,
                        detail(&err)
                    );
                    FileStatus::Failed {
                        error: detail(&err),
                    }
                }
            };

            FileOutcome {
                path: item.dest.clone(),
                status,
            }
        })
        .collect()
}

/// Fill the template README with the descriptor plus `repoPath` when the
/// repository URL resolves to a hosted repository.
pub fn render_readme(
    readme_template: &str,
    descriptor: &Descriptor,
    repos: &mut RepoCache,
) -> Result<String> {
    let mut vars = descriptor.to_value()?;

    if template::is_present(readme_template, "repoPath") {
        let repo = descriptor.repository_url().and_then(|url| repos.resolve(url));
        if let (Some(repo), Some(map)) = (repo, vars.as_object_mut()) {
            map.insert("repoPath".to_string(), Value::String(repo.path()));
        }
    }

    Ok(template::fill(readme_template, &vars))
}

/// Generate `README.md` in the package unless one exists.
pub fn write_readme(
    template_dir: &Path,
    pkg_dir: &Path,
    descriptor: &Descriptor,
    repos: &mut RepoCache,
) -> FileOutcome {
    let dest = pkg_dir.join(README_FILE);
    let status = if dest.exists() {
        FileStatus::Skipped
    } else {
        match generate_readme(template_dir, &dest, descriptor, repos) {
            Ok(()) => {
                crate::tty::status("Generated README");
                FileStatus::Generated
            }
            Err(err) => {
                crate::log_status!("scaffold", "Could not generate README: {}", detail(&err));
                FileStatus::Failed {
                    error: detail(&err),
                }
            }
        }
    };

    FileOutcome {
        path: README_FILE.to_string(),
        status,
    }
}

fn generate_readme(
    template_dir: &Path,
    dest: &Path,
    descriptor: &Descriptor,
    repos: &mut RepoCache,
) -> Result<()> {
    let source = template_dir.join(README_FILE);
    if !source.exists() {
        return Err(Error::template_file_not_found(source.display().to_string()));
    }

    let readme_template = io::read_file(&source, "read README template")?;
    let readme = render_readme(&readme_template, descriptor, repos)?;
    fs::write(dest, readme)
        .map_err(|e| Error::internal_io(e.to_string(), Some("write README.md".to_string())))
}

fn detail(err: &Error) -> String {
    match err.details.get("error").and_then(|e| e.as_str()) {
        Some(inner) => format!("{} ({})", err.message, inner),
        None => err.message.clone(),
    }
}
