use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use learning_companion::call::{spawn_command_reader, CallView, PrimaryAction, UserCommand};
use learning_companion::{
    create_router, AppState, CallSession, CallStatus, Caller, Config, DirectoryService,
    NatsTransport, StoreFactory,
};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "learning-companion")]
#[command(about = "Voice learning companions: directory server and call client")]
struct Cli {
    /// Config file, extension optional
    #[arg(short, long, default_value = "config/learning-companion")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the companion directory HTTP server
    Serve,
    /// Start a voice call with a companion
    Call(CallArgs),
}

#[derive(Args)]
struct CallArgs {
    #[arg(long)]
    companion_id: String,

    /// Caller's user id, recorded in session history
    #[arg(long)]
    user_id: String,

    /// Name shown next to your transcript lines
    #[arg(long, default_value = "You")]
    user_name: String,

    /// Call id on the NATS bus (default: generated)
    #[arg(long)]
    call_id: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("Learning Companion v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);

    match cli.command {
        Command::Serve => serve(cfg).await,
        Command::Call(args) => call(cfg, args).await,
    }
}

async fn serve(cfg: Config) -> Result<()> {
    let store = StoreFactory::open(&cfg.store)?;
    let app = create_router(AppState::new(store, cfg.quota));

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await
        .context("HTTP server failed")?;

    info!("HTTP server stopped");

    Ok(())
}

async fn call(cfg: Config, args: CallArgs) -> Result<()> {
    let store = StoreFactory::open(&cfg.store)?;
    let directory = DirectoryService::new(store, cfg.quota);

    let companion = directory.get_by_id(&args.companion_id).await?;
    let caller = Caller::new(args.user_id);

    let call_id = args
        .call_id
        .unwrap_or_else(|| format!("call-{}", uuid::Uuid::new_v4()));
    let transport = NatsTransport::connect(&cfg.transport.nats_url, call_id).await?;
    info!("Call id: {}", transport.call_id());

    let mut session = CallSession::new(&transport, companion, &cfg.assistant);

    println!("Calling {} about {}", session.companion().name, session.companion().topic);
    println!("Commands: 'm' toggles the microphone, 'q' hangs up");

    session.start_recorded(&directory, &caller).await?;

    let mut command_rx = spawn_command_reader(std::io::BufReader::new(std::io::stdin()));

    let mut shown = CallView::render(session.state(), session.companion(), &args.user_name);
    print_view_changes(None, &shown);

    loop {
        tokio::select! {
            status = session.process_next() => {
                if status.is_none() {
                    warn!("Voice transport stopped delivering events");
                    break;
                }
            }
            command = command_rx.recv() => {
                let result = match command {
                    Some(UserCommand::ToggleMicrophone) => session.toggle_microphone().await.map(|_| ()),
                    Some(UserCommand::HangUp) | None => session.disconnect().await,
                };
                if let Err(e) = result {
                    warn!("{}", e);
                }
            }
        }

        let view = CallView::render(session.state(), session.companion(), &args.user_name);
        print_view_changes(Some(&shown), &view);
        shown = view;

        if session.status() == CallStatus::Finished {
            break;
        }
    }

    println!("Call ended");

    Ok(())
}

/// Print what changed between two renders of the call screen
fn print_view_changes(previous: Option<&CallView>, view: &CallView) {
    if previous.map(|p| p.primary_action) != Some(view.primary_action) {
        match view.primary_action {
            PrimaryAction::Connecting => println!("[connecting]"),
            PrimaryAction::EndCall => println!("[connected]"),
            PrimaryAction::StartCall => {}
        }
    }

    if let Some(previous) = previous {
        if previous.mic_muted != view.mic_muted {
            println!("[microphone {}]", if view.mic_muted { "off" } else { "on" });
        }

        // Transcript is most recent first; print new lines oldest first
        let new_lines = view.transcript.len().saturating_sub(previous.transcript.len());
        for line in view.transcript[..new_lines].iter().rev() {
            println!("{}", line);
        }
    }
}
