//! The package initialisation flow.
//!
//! Reads both descriptors, asks for identity fields, merges, confirms and
//! writes, copies boilerplate, generates the README, then sets up the git
//! repository and its hosted counterpart when the package has none yet.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::SeedConfig;
use crate::descriptor::{Descriptor, DESCRIPTOR_FILE};
use crate::error::{Error, Result};
use crate::git::{self, GitOrigin};
use crate::hosted::{HostedRepo, RepoCache};
use crate::hosting::{self, HostingClient, NewRepo};
use crate::keychain;
use crate::merge::{self, MergeContext, DESCRIPTION_PLACEHOLDER};
use crate::naming;
use crate::prompt::{PromptEngine, TextPrompt};
use crate::scaffold::{self, FileOutcome};
use crate::tty;
use crate::utils::command;

/// Scaffold files left out of the initial commit.
const UNSTAGED_PATHS: &[&str] = &["index.js", "test/test.js"];

const CI_TOKEN_NAME: &str = "GH_TOKEN";

#[derive(Debug, Clone)]
pub struct InitOptions {
    pub package_dir: PathBuf,
    pub template_dir: PathBuf,
    pub config: SeedConfig,
    pub interactive: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum InitOutcome {
    Completed(InitReport),
    Aborted {
        #[serde(rename = "descriptorPath")]
        descriptor_path: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitReport {
    pub descriptor_path: String,
    pub descriptor: Descriptor,
    pub files: Vec<FileOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<RepositorySetup>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySetup {
    pub hosted: HostedRepo,
    pub remote_url: String,
    pub steps: Vec<StepOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StepStatus {
    Ok,
    Failed { error: String },
    Skipped { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub step: String,
    #[serde(flatten)]
    pub status: StepStatus,
}

pub fn run(opts: &InitOptions) -> Result<InitOutcome> {
    tty::headline("Setting up project with pkgseed defaults...");
    if opts.interactive {
        tty::status("Press ^C at any time to quit.");
    }

    let pkg = opts.package_dir.as_path();
    let existing = Descriptor::load_from_dir(pkg)?;
    let template = Descriptor::load_from_dir(&opts.template_dir)?;

    let prompts = PromptEngine::with_interactive(opts.interactive);
    let ctx = merge_context(opts);
    let mut repos = RepoCache::new();

    let existing = ask_identity(existing, &ctx, &prompts)?;
    let descriptor = merge::merge(existing, &template, &ctx, &GitOrigin, &mut repos);

    let descriptor_path = pkg.join(DESCRIPTOR_FILE);
    if !write_descriptor(&descriptor, &descriptor_path, &prompts)? {
        eprintln!("Aborted.");
        return Ok(InitOutcome::Aborted {
            descriptor_path: descriptor_path.display().to_string(),
        });
    }

    let items = scaffold::boilerplate_for(&descriptor);
    let mut files = scaffold::copy_boilerplate(&opts.template_dir, pkg, &items);
    files.push(scaffold::write_readme(
        &opts.template_dir,
        pkg,
        &descriptor,
        &mut repos,
    ));

    let repository = setup_repository(&descriptor, opts, &mut repos);

    eprintln!();
    tty::headline("Done.");

    Ok(InitOutcome::Completed(InitReport {
        descriptor_path: descriptor_path.display().to_string(),
        descriptor,
        files,
        repository,
    }))
}

fn merge_context(opts: &InitOptions) -> MergeContext {
    MergeContext {
        directory: opts.package_dir.clone(),
        remote_account: opts.config.remote_account.clone(),
        naming_prefixes: opts.config.naming_prefixes.clone(),
        has_local_repo: git::is_repo(&opts.package_dir),
        remote_host: opts.config.remote_host.clone(),
        registry_url: opts.config.registry_url.clone(),
    }
}

/// Interactive mode asks for name and description up front; the merge then
/// sees them as present.
fn ask_identity(
    mut descriptor: Descriptor,
    ctx: &MergeContext,
    prompts: &PromptEngine,
) -> Result<Descriptor> {
    if !prompts.is_interactive() {
        return Ok(descriptor);
    }

    let default_name = descriptor
        .name
        .clone()
        .or_else(|| naming::derive_name(&ctx.directory, &ctx.naming_prefixes))
        .unwrap_or_default();
    let name = prompts.text(&TextPrompt {
        question: "package name:".to_string(),
        default: default_name,
    })?;
    if !name.is_empty() {
        descriptor.name = Some(name);
    }

    let description = prompts.text(&TextPrompt {
        question: "description:".to_string(),
        default: descriptor
            .description
            .clone()
            .unwrap_or_else(|| DESCRIPTION_PLACEHOLDER.to_string()),
    })?;
    descriptor.description = Some(description);

    Ok(descriptor)
}

/// Show, confirm (interactive only) and persist. Returns false when the user
/// declined.
fn write_descriptor(
    descriptor: &Descriptor,
    path: &Path,
    prompts: &PromptEngine,
) -> Result<bool> {
    let json = descriptor.to_pretty_json()?;

    if prompts.is_interactive() {
        eprintln!("About to write to {}:\n\n{}", path.display(), json);
        if !prompts.confirm("Is this OK?")? {
            return Ok(false);
        }
    }

    descriptor.save(path)?;

    if prompts.is_interactive() {
        tty::status("Saved package.json");
    } else {
        tty::status(&format!("Wrote to {}:\n\n{}", path.display(), json));
    }

    Ok(true)
}

fn setup_repository(
    descriptor: &Descriptor,
    opts: &InitOptions,
    repos: &mut RepoCache,
) -> Option<RepositorySetup> {
    let pkg = opts.package_dir.as_path();

    let is_git = descriptor
        .repository
        .as_ref()
        .is_some_and(|repository| repository.is_git());
    if !is_git {
        return None;
    }

    let Some(hosted) = descriptor.repository_url().and_then(|url| repos.resolve(url)) else {
        crate::log_status!(
            "git",
            "No recognizable repository URL, skipping repository setup"
        );
        return None;
    };

    if git::is_repo(pkg) {
        crate::log_status!("git", "{} is already a git repository", pkg.display());
        return None;
    }

    eprintln!();
    tty::headline("Setting up project...");

    let config = &opts.config;
    let branch = config.default_branch.as_str();
    let remote_url = hosted.https_url();
    let mut steps = StepLog::default();

    steps.record("git init", git::init(pkg));
    steps.record(
        "install dependencies",
        install_dependencies(pkg, &config.install_command),
    );
    steps.record("git add", git::add_all(pkg));

    let scaffolded: Vec<&str> = UNSTAGED_PATHS
        .iter()
        .copied()
        .filter(|path| pkg.join(path).exists())
        .collect();
    if scaffolded.is_empty() {
        steps.skip("unstage scaffold files", "no scaffold files present");
    } else {
        steps.record("unstage scaffold files", git::unstage(pkg, &scaffolded));
    }

    steps.record(
        "git commit",
        git::commit(pkg, "Initial commit", Some(&config.commit_trailer)),
    );
    steps.record("rename branch", git::rename_branch(pkg, branch));
    steps.record("add remote", git::add_remote(pkg, "origin", &remote_url));

    let token = keychain::hosting_token(hosted.host.domain(), &hosted.owner);
    match &token {
        Ok(token) => {
            let created = HostingClient::github(token.clone()).and_then(|client| {
                client.create_repository(&NewRepo {
                    repo: &hosted,
                    description: descriptor.description.as_deref().unwrap_or_default(),
                    homepage: descriptor.homepage.as_deref(),
                })
            });
            steps.record("create hosted repository", created);
        }
        Err(err) => steps.record::<()>("create hosted repository", Err(err.clone())),
    }

    steps.record("push", git::push_upstream(pkg, "origin", branch));

    if !config.ci_secret {
        steps.skip("store CI secret", "disabled in configuration");
    } else {
        match &token {
            Ok(token) => {
                let stored = store_ci_token(pkg, &hosted, token, &config.commit_trailer);
                if stored.is_ok() {
                    tty::headline("Added encrypted access token to Travis-CI config");
                }
                steps.record("store CI secret", stored);
            }
            Err(_) => steps.skip("store CI secret", "no hosting token available"),
        }
    }

    Some(RepositorySetup {
        hosted,
        remote_url,
        steps: steps.into_inner(),
    })
}

fn install_dependencies(pkg: &Path, install_command: &[String]) -> Result<String> {
    let Some((program, args)) = install_command.split_first() else {
        return Err(Error::config_invalid_value(
            "installCommand",
            "installCommand cannot be empty",
        ));
    };
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    command::run_in(pkg, program, &args)
}

fn store_ci_token(pkg: &Path, repo: &HostedRepo, token: &str, trailer: &str) -> Result<String> {
    hosting::store_ci_secret(pkg, repo, CI_TOKEN_NAME, token)?;
    git::add_paths(pkg, &[".travis.yml"])?;
    git::commit(
        pkg,
        "ci(Travis): Add GitHub access token to config",
        Some(trailer),
    )?;
    git::push(pkg)
}

#[derive(Default)]
struct StepLog {
    steps: Vec<StepOutcome>,
}

impl StepLog {
    fn record<T>(&mut self, step: &str, result: Result<T>) {
        let status = match result {
            Ok(_) => StepStatus::Ok,
            Err(err) => {
                let error = describe(&err);
                crate::log_status!("git", "{} failed: {}", step, error);
                StepStatus::Failed { error }
            }
        };
        self.push(step, status);
    }

    fn skip(&mut self, step: &str, reason: &str) {
        crate::log_status!("git", "Skipping {}: {}", step, reason);
        self.push(
            step,
            StepStatus::Skipped {
                reason: reason.to_string(),
            },
        );
    }

    fn push(&mut self, step: &str, status: StepStatus) {
        self.steps.push(StepOutcome {
            step: step.to_string(),
            status,
        });
    }

    fn into_inner(self) -> Vec<StepOutcome> {
        self.steps
    }
}

fn describe(err: &Error) -> String {
    let inner = err
        .details
        .get("stderr")
        .or_else(|| err.details.get("error"))
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty());

    match inner {
        Some(inner) => format!("{}: {}", err.message, inner),
        None => err.message.clone(),
    }
}
