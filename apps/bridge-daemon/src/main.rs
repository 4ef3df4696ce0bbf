use anyhow::Result;
use clap::Parser;
use command_pipeline::{CommandPipeline, ConverterConfig, PipelineConfig};
use lm_gateway::{new_generator, GeneratorKind, TemplateStore};
use robot_link::{LinkConfig, RobotLink};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "bridge-daemon")]
#[command(about = "L-Bot bridge: natural language to LBML commands over the robot socket")]
struct Args {
    /// Robot controller host
    #[arg(long, default_value = "localhost")]
    robot_host: String,

    /// Robot controller port
    #[arg(long, default_value = "9999")]
    robot_port: u16,

    /// Directory holding prompt templates
    #[arg(long, default_value = "prompts")]
    prompts_dir: String,

    /// Generation backend (scripted | openai)
    #[arg(long, default_value = "scripted")]
    backend: String,

    /// Model id for conversion
    #[arg(long, default_value = "gpt-4.1-mini")]
    model: String,

    /// Model id for unit normalization
    #[arg(long, default_value = "gpt-4.1-nano")]
    normalize_model: String,

    /// Skip the unit-normalization pre-pass
    #[arg(long)]
    no_normalize: bool,

    /// Run without a robot connection
    #[arg(long)]
    no_robot: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();

    let args = Args::parse();
    info!("L-Bot bridge daemon starting");

    let backend = match args.backend.as_str() {
        "scripted" => GeneratorKind::Scripted,
        "openai" => GeneratorKind::OpenAi,
        other => {
            error!("Unknown generation backend: {}", other);
            return Err(anyhow::anyhow!("unknown generation backend"));
        }
    };
    let api_key = std::env::var("OPENAI_API_KEY").ok();
    let generator = new_generator(backend, api_key)
        .map_err(|e| anyhow::anyhow!("Failed to create generator: {}", e))?;

    let templates = TemplateStore::new(&args.prompts_dir);
    let config = PipelineConfig {
        normalize: !args.no_normalize,
        normalize_model: args.normalize_model.clone(),
        converter: ConverterConfig {
            model: args.model.clone(),
            ..ConverterConfig::default()
        },
        ..PipelineConfig::default()
    };

    let link = Arc::new(RobotLink::new(LinkConfig::new(
        args.robot_host.clone(),
        args.robot_port,
    )));
    let mut pipeline = CommandPipeline::new(generator, templates, config)
        .map_err(|e| anyhow::anyhow!("Failed to build pipeline: {}", e))?;

    if args.no_robot {
        info!("robot link disabled; running generation-only");
    } else {
        // Connect eagerly; a controller that is not running is tolerated.
        if !link.connect().await {
            warn!("robot controller unreachable; running generation-only (use :connect to retry)");
        }
        pipeline = pipeline.with_link(Arc::clone(&link));
    }

    run_console(&pipeline, &link).await?;

    // Release the connection deterministically, whatever state it is in.
    link.disconnect().await;
    info!("bridge daemon shutting down");
    Ok(())
}

async fn run_console(pipeline: &CommandPipeline, link: &Arc<RobotLink>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("Type a movement instruction, or :send <line>, :connect, :status, :quit.");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if !handle_line(pipeline, link, line).await {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// One console line. Returns false when the console should exit.
async fn handle_line(pipeline: &CommandPipeline, link: &Arc<RobotLink>, line: &str) -> bool {
    if line == ":quit" || line == ":exit" {
        return false;
    }

    if line == ":status" {
        println!("robot link: {}", link.state());
        return true;
    }

    if line == ":connect" {
        if link.connect().await {
            println!("connected");
        } else {
            println!("connect failed; robot link is {}", link.state());
        }
        return true;
    }

    if let Some(raw) = line.strip_prefix(":send ") {
        // Manual dispatch straight to the socket. Also the way to reach the
        // controller's own console commands (stop, status, quit).
        let raw = raw.trim();
        if link.send(raw).await {
            println!("sent: {raw}");
        } else {
            println!("send failed; robot link is {}", link.state());
        }
        return true;
    }

    match pipeline.process(line).await {
        Ok(command) => println!("{command}"),
        Err(e) => println!("no valid command produced: {e}"),
    }
    true
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
