//! SiteGuard Scanner - Command-line front end for the audit engine
//!
//! Every subcommand prints JSON on stdout; logs go to stderr.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use siteguard_audit::Auditor;
use siteguard_checks::builtin_registry;
use siteguard_common::{Config, LogConfig, LogFormat};
use siteguard_core::{CheckContext, GradeScale, MessageBucket, MessageId, Priority};
use siteguard_firewall::{Firewall, Request};
use siteguard_store::{Database, ResultStore, StoreSite};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// SiteGuard security auditor
#[derive(Parser, Debug)]
#[command(name = "siteguard-scanner")]
#[command(version)]
#[command(about = "Audit a site's security posture and fix what can be fixed", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "/etc/siteguard/siteguard.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error), overrides config
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (pretty, json, compact), overrides config
    #[arg(long)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan one check
    Scan { name: String },

    /// Fix one check; with --field, complete a pending delayed fix
    Fix {
        name: String,

        /// Form value as name=value, repeatable
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Scan every check, or those of one priority
    RunAll {
        #[arg(long)]
        priority: Option<Priority>,
    },

    /// Stored state of every check with the current score
    Status,

    /// Score history with trends
    History,

    /// Message catalogue of a check
    Messages {
        name: String,

        /// Only messages of this bucket (good, warning, bad, cantfix)
        #[arg(long, value_parser = parse_bucket)]
        bucket: Option<MessageBucket>,

        /// A single message
        #[arg(long)]
        id: Option<MessageId>,
    },

    /// Evaluate a request against the firewall rules
    Firewall {
        #[arg(long, default_value = "GET")]
        method: String,

        #[arg(long, default_value = "")]
        user_agent: String,

        #[arg(long, default_value = "/")]
        uri: String,

        #[arg(long, default_value = "")]
        host: String,

        #[arg(long, default_value = "")]
        referer: String,
    },
}

fn parse_field(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected name=value, got '{}'", raw))
}

fn parse_bucket(raw: &str) -> std::result::Result<MessageBucket, String> {
    match raw.to_lowercase().as_str() {
        "good" => Ok(MessageBucket::Good),
        "warning" => Ok(MessageBucket::Warning),
        "bad" => Ok(MessageBucket::Bad),
        "cantfix" => Ok(MessageBucket::CantFix),
        other => Err(format!("unknown bucket '{}'", other)),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = if Path::new(&args.config).exists() {
        Config::from_file(&args.config)?
    } else {
        Config::default()
    };
    let config = config.merge_env();
    config.validate()?;

    let mut log_config = LogConfig::from(&config.logging);
    if let Some(level) = &args.log_level {
        log_config = log_config.level(level.clone());
    }
    if let Some(format) = &args.log_format {
        log_config = log_config.format(LogFormat::parse(format));
    }
    siteguard_common::init_logging_with_config(log_config);

    debug!("Version: {}", env!("CARGO_PKG_VERSION"));
    if !Path::new(&args.config).exists() {
        info!("Config file {} not found, using defaults", args.config);
    }

    let output = match args.command {
        Command::Firewall {
            method,
            user_agent,
            uri,
            host,
            referer,
        } => evaluate_request(
            &config,
            Request::new(method, uri)
                .with_user_agent(user_agent)
                .with_host(host)
                .with_referer(referer),
        )?,
        command => run_audit_command(&config, command)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn build_auditor(config: &Config) -> Result<Auditor> {
    let db = Database::open(&config.store.database_path)
        .with_context(|| format!("opening {}", config.store.database_path))?;

    let site = StoreSite::new(db.clone(), &config.site.root, &config.site.home_url)
        .with_apache(config.site.apache)
        .with_plugin_slug(&config.site.plugin_slug);
    site.seed_users(&config.site.users)?;

    let mut ctx = CheckContext::new(Arc::new(site))
        .with_pro(config.scanner.pro)
        .with_timeout(config.scanner.http_timeout());
    if let Some(logins) = &config.site.forbidden_logins {
        ctx = ctx.with_forbidden_logins(logins.clone());
    }

    let grades: GradeScale = config.scanner.grade_thresholds;
    let store = ResultStore::new(db).with_history_limit(config.scanner.history_cap);
    Ok(Auditor::new(builtin_registry()?, store, ctx).with_grade_scale(grades))
}

fn run_audit_command(config: &Config, command: Command) -> Result<Value> {
    let auditor = build_auditor(config)?;

    let output = match command {
        Command::Scan { name } => {
            let check = auditor.registry().get(&name)?;
            let result = auditor.run_one(&name)?;
            json!({
                "name": name,
                "rendered": result.render(check.catalogue()),
                "result": result,
            })
        }
        Command::Fix { name, fields } => {
            let report = if fields.is_empty() {
                auditor.fix(&name)?
            } else {
                let fields: HashMap<String, String> = fields.into_iter().collect();
                auditor.fix_with_input(&name, &fields)?
            };
            serde_json::to_value(report)?
        }
        Command::RunAll { priority } => {
            let report = auditor.run_all(priority);
            if !report.errors.is_empty() {
                info!("{} store error(s) during the run", report.errors.len());
            }
            serde_json::to_value(report)?
        }
        Command::Status => json!({
            "score": auditor.score()?,
            "checks": auditor.states()?,
        }),
        Command::History => serde_json::to_value(auditor.history()?)?,
        Command::Messages { name, bucket, id } => {
            let check = auditor.registry().get(&name)?;
            let messages: Vec<Value> = check
                .catalogue()
                .select(bucket, id)
                .into_iter()
                .map(|(id, text)| {
                    json!({ "id": id, "bucket": MessageBucket::of(id), "text": text })
                })
                .collect();
            json!({ "name": name, "messages": messages })
        }
        Command::Firewall { .. } => bail!("firewall does not use the result store"),
    };

    Ok(output)
}

fn evaluate_request(config: &Config, request: Request) -> Result<Value> {
    let firewall = Firewall::new(&config.firewall.deny_lists())?
        .with_method_check(config.firewall.check_methods)
        .with_html_agent_check(config.firewall.check_html_agents);

    let decision = firewall.evaluate(&request);
    let mut output = serde_json::to_value(decision)?;
    if let (Some(block_id), Value::Object(map)) = (decision.block_id(), &mut output) {
        map.insert("reason".into(), json!(block_id.description()));
    }
    Ok(output)
}
