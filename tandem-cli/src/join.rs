use anyhow::{Context, Result};
use colored::*;
use dialoguer::Input;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tandem::peer::{
    IceStrategy, LinkConfig, RelayClient, SessionConfig, SessionEvent, SessionHandle,
    WebRtcEngine, attach, new_link,
};
use tracing::warn;

pub struct JoinArgs {
    pub url: String,
    pub room: Option<String>,
    pub email: Option<String>,
    pub call: bool,
    pub trickle: bool,
}

pub async fn run(args: JoinArgs) -> Result<()> {
    let email = match args.email {
        Some(email) => email,
        None => prompt("Email")?,
    };
    let room = match args.room {
        Some(room) => room,
        None => prompt("Room")?,
    };

    let link_config = LinkConfig {
        ice_strategy: if args.trickle {
            IceStrategy::Trickle
        } else {
            IceStrategy::default()
        },
        ..LinkConfig::default()
    };

    let (client, relay) = RelayClient::connect_channel(&args.url).await?;
    println!(
        "{} {} {}",
        "Connected to".green().bold(),
        args.url.cyan(),
        format!("as {}", client.id()).dimmed()
    );

    let (link, engine_events) = new_link(&link_config)
        .await
        .context("Failed to create peer connection")?;
    let mut session = attach(link, engine_events, relay, SessionConfig::default());

    client.join(email.as_str(), room.as_str());
    println!("{} {}", "Joined room".green(), room.bold());

    // Typed lines go to the peer once the data channel is open.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            event = session.next_event() => match event {
                Some(event) => on_event(&mut session, &link_config, event, args.call).await?,
                None => {
                    println!("{}", "Session ended".yellow());
                    break;
                }
            },
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(text)) if !text.is_empty() => session.send_message(text)?,
                Ok(Some(_)) => {}
                Ok(None) => stdin_open = false,
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    stdin_open = false;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                println!("{}", "Leaving".yellow());
                break;
            }
        }
    }

    session.detach().await;
    Ok(())
}

async fn on_event(
    session: &mut SessionHandle<WebRtcEngine>,
    link_config: &LinkConfig,
    event: SessionEvent,
    auto_call: bool,
) -> Result<()> {
    match event {
        SessionEvent::PeerJoined { email, id } => {
            println!("{} {} ({})", "→ joined:".cyan(), email.bold(), id);
            if auto_call {
                println!("{}", "Calling...".cyan());
                session.call()?;
            }
        }
        SessionEvent::IncomingCall { from } => {
            println!("{} {}", "← incoming call from".cyan(), from);
        }
        SessionEvent::Negotiated => println!("{}", "Negotiation complete".green()),
        SessionEvent::Connected => println!("{}", "Peer connection established".green().bold()),
        SessionEvent::DataChannelOpen { label } => {
            println!("{} '{}'", "Data channel open:".green(), label);
        }
        SessionEvent::Message { label, data } => {
            println!("{} {}", format!("[{label}]").magenta(), String::from_utf8_lossy(&data));
        }
        SessionEvent::PeerLeft { id } => println!("{} {}", "← left:".yellow(), id),
        SessionEvent::Error { message } => println!("{} {}", "Error:".red(), message),
        SessionEvent::ConnectionFailed { reason } => {
            println!("{} {}", "Connection failed:".red().bold(), reason);

            // Fresh link so the next call or incoming offer can succeed.
            tokio::time::sleep(Duration::from_millis(500)).await;
            match new_link(link_config).await {
                Ok((link, engine_events)) => session.replace_link(link, engine_events)?,
                Err(e) => warn!("Failed to create replacement link: {:#}", e),
            }
        }
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(label)
        .interact_text()
        .with_context(|| format!("Failed to read {label}"))
}
