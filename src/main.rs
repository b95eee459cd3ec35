//! # Provider Bridge 命令行
//!
//! 从 TOML 配置文件或环境变量构建提供商实例，执行一次操作并以 JSON 输出结果

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;

use provider_bridge::{
    IssueTracker, Notifier, Provider, ProviderConfig, ProviderContext,
    auth::AuthSchema,
    config::{self, AppConfig, ProviderKind},
    lerror, linfo,
    logging::{self, LogComponent, LogStage, SYSTEM_REQUEST_ID},
    provider::ExecutorOptions,
    providers::{
        IssueUpdate, LinearAuthConfig, LinearProvider, OutboundMessage, SlackAuthConfig,
        SlackProvider,
    },
};

#[derive(Debug, Parser)]
#[command(name = "provider-bridge", version, about = "Run one operation against a third-party provider")]
struct Cli {
    /// TOML 配置文件；缺省时从环境变量构建
    #[arg(long, env = "PROVIDER_BRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// 配置文件中的提供商实例 ID
    #[arg(long)]
    provider: Option<String>,

    #[arg(long, env = "PROVIDER_BRIDGE_LOG_LEVEL")]
    log_level: Option<String>,

    /// 透传给上游的关联 ID
    #[arg(long)]
    correlation_id: Option<String>,

    #[arg(long, default_value = "singletenant")]
    tenant: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 问题跟踪操作
    #[command(subcommand)]
    Issues(IssuesCommand),
    /// 发送一条消息
    Notify {
        #[arg(long)]
        text: String,
        #[arg(long)]
        channel: Option<String>,
        #[arg(long)]
        thread: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum IssuesCommand {
    List,
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        id: String,
    },
}

impl Command {
    const fn kind(&self) -> ProviderKind {
        match self {
            Self::Issues(_) => ProviderKind::Linear,
            Self::Notify { .. } => ProviderKind::Slack,
        }
    }
}

/// 解析得到的实例：ID、配置与执行器选项
struct ResolvedProvider {
    id: String,
    config: ProviderConfig,
    options: ExecutorOptions,
}

fn resolve_provider(cli: &Cli, kind: ProviderKind) -> anyhow::Result<ResolvedProvider> {
    let Some(path) = &cli.config else {
        let (prefix, fields) = match kind {
            ProviderKind::Linear => ("LINEAR", LinearAuthConfig::FIELDS),
            ProviderKind::Slack => ("SLACK", SlackAuthConfig::FIELDS),
        };
        let config = ProviderConfig::from_lookup(
            format!("{kind} provider from environment"),
            prefix,
            fields,
            |key| std::env::var(key).ok(),
        );
        return Ok(ResolvedProvider {
            id: cli.provider.clone().unwrap_or_else(|| kind.to_string()),
            config,
            options: ExecutorOptions::default(),
        });
    };

    let app: AppConfig = config::load_config(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    let entry = match &cli.provider {
        Some(id) => app
            .find(id)
            .with_context(|| format!("provider '{id}' not found in {}", path.display()))?,
        None => app
            .first_of_kind(kind)
            .with_context(|| format!("no {kind} provider configured in {}", path.display()))?,
    };
    let entry_kind = entry.kind()?;
    if entry_kind != kind {
        bail!("provider '{}' is {entry_kind}, command needs {kind}", entry.id);
    }

    Ok(ResolvedProvider {
        id: entry.id.clone(),
        config: entry.provider_config(),
        options: app.executor_options(entry),
    })
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_issues(
    provider: &LinearProvider,
    command: IssuesCommand,
    correlation_id: Option<&str>,
) -> anyhow::Result<()> {
    match command {
        IssuesCommand::List => print_json(&provider.fetch_issues(correlation_id).await?),
        IssuesCommand::Create { title, description } => print_json(
            &provider
                .create_issue(&title, &description, correlation_id)
                .await?,
        ),
        IssuesCommand::Edit {
            id,
            title,
            description,
        } => {
            let update = IssueUpdate { title, description };
            print_json(&provider.edit_issue(&id, &update, correlation_id).await?)
        }
        IssuesCommand::Delete { id } => print_json(&serde_json::json!({
            "id": id,
            "deleted": provider.delete_issue(&id, correlation_id).await?,
        })),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let context = ProviderContext::new(cli.tenant.clone());
    let resolved = resolve_provider(&cli, cli.command.kind())?;
    let correlation_id = cli.correlation_id.as_deref();

    match cli.command {
        Command::Issues(command) => {
            let mut provider = LinearProvider::with_options(
                &context,
                resolved.id,
                &resolved.config,
                &resolved.options,
            )?;
            let outcome = run_issues(&provider, command, correlation_id).await;
            provider.dispose();
            outcome
        }
        Command::Notify {
            text,
            channel,
            thread,
        } => {
            let mut provider = SlackProvider::with_options(
                &context,
                resolved.id,
                &resolved.config,
                &resolved.options,
            )?;
            let message = OutboundMessage {
                text,
                channel,
                thread_id: thread,
            };
            let outcome = provider.notify(&message, correlation_id).await;
            provider.dispose();
            print_json(&outcome?)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref());

    linfo!(
        SYSTEM_REQUEST_ID,
        LogStage::Startup,
        LogComponent::Main,
        "cli_start",
        &format!("执行命令: {:?}", cli.command)
    );

    if let Err(e) = run(cli).await {
        lerror!(
            SYSTEM_REQUEST_ID,
            LogStage::Shutdown,
            LogComponent::Main,
            "cli_failed",
            &format!("命令执行失败: {e:#}")
        );
        return Err(e);
    }
    Ok(())
}
