use crate::auth::login;
use crate::client::LgoClient;
use crate::config::ResolvedConfig;
use crate::constants::DOCUMENT_EXTENSION;
use crate::credentials::Credentials;
use crate::downloader::{fetch_document_list, save_document_as};
use crate::errors::{AppError, AppResult};
use crate::models::{CollisionPolicy, Document, Session};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// CLI metadata constants
const APP_NAME: &str = env!("CARGO_PKG_NAME");
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

/// Outcome of a completed download run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DownloadSummary {
    /// Documents listed by the service
    pub total: usize,
    /// Documents written to disk
    pub downloaded: usize,
    /// Downloads that replaced a file written earlier in the same run
    pub overwritten: usize,
}

/// Builds the command-line interface.
///
/// No argument carries a clap default value so that values from a TOML
/// config file are only overridden by flags the user actually passed.
pub fn build_command() -> Command<'static> {
    Command::new(APP_NAME)
        .version(APP_VERSION)
        .about(APP_ABOUT)
        .after_help("Example:\n  lgo-downloader -a .auth -o out --on-collision suffix")
        .arg(
            Arg::new("auth")
                .short('a')
                .long("auth")
                .help("Credentials file, JSON with Email and Password [default: .auth]")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("out")
                .short('o')
                .long("out")
                .help("Directory the documents are stored in, must exist [default: out]")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to a TOML config file")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .help("Time limit per request in seconds, body included [default: 30]")
                .value_parser(clap::value_parser!(u64))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("on_collision")
                .long("on-collision")
                .value_parser(clap::value_parser!(String))
                .help("Same year and month twice: overwrite, fail or suffix [default: overwrite]")
                .action(ArgAction::Set),
        )
}

/// Resolves the effective configuration: defaults, then the TOML file, then flags.
pub fn resolve_config(matches: &ArgMatches) -> AppResult<ResolvedConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ResolvedConfig::from_toml_file(path)?,
        None => ResolvedConfig::default(),
    };

    if let Some(auth_file) = matches.get_one::<PathBuf>("auth") {
        config.auth_file = auth_file.clone();
    }
    if let Some(out_dir) = matches.get_one::<PathBuf>("out") {
        config.out_dir = out_dir.clone();
    }
    if let Some(&timeout_secs) = matches.get_one::<u64>("timeout") {
        config.timeout_secs = timeout_secs;
    }
    if let Some(policy) = matches.get_one::<String>("on_collision") {
        config.on_collision = policy.parse()?;
    }

    config.validate()?;
    Ok(config)
}

/// Parses command-line arguments and runs the download workflow.
///
/// # Returns
///
/// Returns `Ok(())` once every listed document was saved. Returns an error if:
/// - The configuration or credentials cannot be loaded
/// - Login, listing or any download fails
/// - A file cannot be written
pub async fn cli() -> AppResult<()> {
    let matches = build_command().get_matches();
    let config = resolve_config(&matches)?;

    run_workflow(&config).await?;
    Ok(())
}

/// Logs in, lists the documents and saves each one, strictly in listing order.
///
/// The run stops at the first failing document. How many documents were
/// saved before the failure is logged before the error is returned.
pub async fn run_workflow(config: &ResolvedConfig) -> AppResult<DownloadSummary> {
    config.check_out_dir()?;
    let credentials = Credentials::from_file(&config.auth_file)?;
    let client = LgoClient::new(config)?;

    info!(
        base_url = client.base_url(),
        out_dir = %config.out_dir.display(),
        on_collision = config.on_collision.display_name(),
        "Starting download run"
    );

    let session = login(&client, &credentials).await?;
    let documents = fetch_document_list(&client, &session).await?;

    let mut summary = DownloadSummary {
        total: documents.len(),
        ..DownloadSummary::default()
    };
    let mut planner = TargetPlanner::new(&config.out_dir, config.on_collision);

    for document in &documents {
        match download_one(&client, &session, &mut planner, document).await {
            Ok(target) => {
                summary.downloaded += 1;
                if target.replaces_earlier {
                    summary.overwritten += 1;
                }
            }
            Err(e) => {
                warn!(
                    downloaded = summary.downloaded,
                    total = summary.total,
                    document = %document.name,
                    "Download run aborted"
                );
                return Err(e);
            }
        }
    }

    info!(
        downloaded = summary.downloaded,
        total = summary.total,
        overwritten = summary.overwritten,
        "All documents downloaded"
    );

    Ok(summary)
}

async fn download_one(
    client: &LgoClient,
    session: &Session,
    planner: &mut TargetPlanner<'_>,
    document: &Document,
) -> AppResult<Target> {
    let target = planner.plan(document)?;
    save_document_as(client, session, document, &target.path).await?;
    Ok(target)
}

/// Output file chosen for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Target {
    path: PathBuf,
    replaces_earlier: bool,
}

/// Maps documents to output files and applies the collision policy.
struct TargetPlanner<'a> {
    out_dir: &'a Path,
    policy: CollisionPolicy,
    // output path -> name of the document saved there
    used: HashMap<PathBuf, String>,
}

impl<'a> TargetPlanner<'a> {
    fn new(out_dir: &'a Path, policy: CollisionPolicy) -> Self {
        Self {
            out_dir,
            policy,
            used: HashMap::new(),
        }
    }

    fn plan(&mut self, document: &Document) -> AppResult<Target> {
        let canonical = self.out_dir.join(document.file_name()?);

        let path = match (self.used.get(&canonical), self.policy) {
            (None, _) => canonical,
            (Some(_), CollisionPolicy::Fail) => {
                return Err(AppError::FileCollision(canonical));
            }
            (Some(_), CollisionPolicy::Suffix) => {
                self.unused_path(&document.suffixed_file_name()?)
            }
            (Some(previous), CollisionPolicy::Overwrite) => {
                warn!(
                    file_path = %canonical.display(),
                    previous = %previous,
                    document = %document.name,
                    "Two documents share year and month, overwriting the earlier file"
                );
                canonical
            }
        };

        let replaces_earlier = self
            .used
            .insert(path.clone(), document.name.clone())
            .is_some();

        Ok(Target {
            path,
            replaces_earlier,
        })
    }

    /// `file_name` in the output directory, numbered `-2`, `-3`, ... while taken.
    fn unused_path(&self, file_name: &str) -> PathBuf {
        let candidate = self.out_dir.join(file_name);
        if !self.used.contains_key(&candidate) {
            return candidate;
        }

        let stem = file_name
            .strip_suffix(&format!(".{DOCUMENT_EXTENSION}"))
            .unwrap_or(file_name);
        (2u32..)
            .map(|n| {
                self.out_dir
                    .join(format!("{stem}-{n}.{DOCUMENT_EXTENSION}"))
            })
            .find(|path| !self.used.contains_key(path))
            .unwrap_or(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(year: i32, month: u32, name: &str) -> Document {
        Document {
            year,
            month,
            name: name.to_string(),
            download_path: "/docs".to_string(),
            doc_type: "payslip".to_string(),
            read: false,
            created_at: 0,
        }
    }

    #[test]
    fn no_flags_yield_defaults() {
        let matches = build_command()
            .try_get_matches_from(vec!["lgo-downloader"])
            .unwrap();
        let config = resolve_config(&matches).unwrap();
        assert_eq!(config.auth_file, PathBuf::from(".auth"));
        assert_eq!(config.out_dir, PathBuf::from("out"));
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.on_collision, CollisionPolicy::Overwrite);
    }

    #[test]
    fn short_flags_override_defaults() {
        let matches = build_command()
            .try_get_matches_from(vec![
                "lgo-downloader",
                "-a",
                "creds.json",
                "-o",
                "pdfs",
                "-t",
                "5",
                "--on-collision",
                "fail",
            ])
            .unwrap();
        let config = resolve_config(&matches).unwrap();
        assert_eq!(config.auth_file, PathBuf::from("creds.json"));
        assert_eq!(config.out_dir, PathBuf::from("pdfs"));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.on_collision, CollisionPolicy::Fail);
    }

    #[test]
    fn invalid_collision_policy_errors() {
        let matches = build_command()
            .try_get_matches_from(vec!["lgo-downloader", "--on-collision", "skip"])
            .unwrap();
        assert!(matches!(
            resolve_config(&matches),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn zero_timeout_flag_errors() {
        let matches = build_command()
            .try_get_matches_from(vec!["lgo-downloader", "--timeout", "0"])
            .unwrap();
        assert!(resolve_config(&matches).is_err());
    }

    #[test]
    fn non_numeric_timeout_is_rejected_by_clap() {
        let result = build_command().try_get_matches_from(vec!["lgo-downloader", "-t", "soon"]);
        assert!(result.is_err());
    }

    #[test]
    fn planner_overwrite_reuses_canonical_name() {
        let mut planner = TargetPlanner::new(Path::new("out"), CollisionPolicy::Overwrite);
        let first = planner.plan(&document(2023, 3, "a.pdf")).unwrap();
        let second = planner.plan(&document(2023, 3, "b.pdf")).unwrap();

        assert_eq!(first.path, PathBuf::from("out/2023-March.pdf"));
        assert!(!first.replaces_earlier);
        assert_eq!(second.path, first.path);
        assert!(second.replaces_earlier);
    }

    #[test]
    fn planner_fail_rejects_second_document() {
        let mut planner = TargetPlanner::new(Path::new("out"), CollisionPolicy::Fail);
        planner.plan(&document(2023, 3, "a.pdf")).unwrap();
        let err = planner.plan(&document(2023, 3, "b.pdf")).unwrap_err();

        assert!(matches!(
            err,
            AppError::FileCollision(path) if path == Path::new("out/2023-March.pdf")
        ));
    }

    #[test]
    fn planner_suffix_disambiguates_by_name() {
        let mut planner = TargetPlanner::new(Path::new("out"), CollisionPolicy::Suffix);
        let first = planner.plan(&document(2023, 3, "a.pdf")).unwrap();
        let second = planner.plan(&document(2023, 3, "bonus.pdf")).unwrap();

        assert_eq!(first.path, PathBuf::from("out/2023-March.pdf"));
        assert_eq!(second.path, PathBuf::from("out/2023-March-bonus.pdf"));
        assert!(!second.replaces_earlier);
    }

    #[test]
    fn planner_suffix_numbers_repeated_names() {
        let mut planner = TargetPlanner::new(Path::new("out"), CollisionPolicy::Suffix);
        let paths: Vec<PathBuf> = (0..4)
            .map(|_| planner.plan(&document(2023, 6, "x.pdf")).unwrap().path)
            .collect();

        assert_eq!(
            paths,
            vec![
                PathBuf::from("out/2023-June.pdf"),
                PathBuf::from("out/2023-June-x.pdf"),
                PathBuf::from("out/2023-June-x-2.pdf"),
                PathBuf::from("out/2023-June-x-3.pdf"),
            ]
        );
    }

    #[test]
    fn planner_distinct_months_never_collide() {
        let mut planner = TargetPlanner::new(Path::new("out"), CollisionPolicy::Fail);
        assert!(planner.plan(&document(2023, 1, "a.pdf")).is_ok());
        assert!(planner.plan(&document(2023, 2, "a.pdf")).is_ok());
        assert!(planner.plan(&document(2022, 1, "a.pdf")).is_ok());
    }

    #[test]
    fn planner_rejects_invalid_month() {
        let mut planner = TargetPlanner::new(Path::new("out"), CollisionPolicy::Overwrite);
        assert!(matches!(
            planner.plan(&document(2023, 0, "a.pdf")),
            Err(AppError::InvalidMonth(0))
        ));
    }
}
