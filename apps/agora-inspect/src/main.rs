#![forbid(unsafe_code)]

//! Local diagnostic for channel permissions: feed it the wire-shaped channel
//! and identity records and it prints the derived role and the full
//! predicate matrix, plus the blocked-groups explanation for denied posts.

use std::fs;
use std::path::PathBuf;

use agora_core::{
    can_create_reaction, can_delete_channel, can_edit_channel, can_edit_post_status,
    can_moderate_channel, can_post_to_channel, can_read_channel, can_reply_to_channel,
    cannot_create_post_groups_blocked, channel_role, screen_post_body, Channel, ChannelRecordDto,
    Identity, Reaction,
};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "agora-inspect", about = "inspect discussion-channel permissions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Derive one identity's role and predicate matrix on one channel.
    Inspect {
        /// Channel record JSON file.
        #[arg(long)]
        channel: PathBuf,
        /// Identity JSON file; omit for an anonymous caller.
        #[arg(long)]
        identity: Option<PathBuf>,
        /// Post body to screen against the channel's block words.
        #[arg(long)]
        body: Option<String>,
    },
    /// Print the default seed for a new channel in the given org.
    Seed {
        #[arg(long)]
        org_id: String,
    },
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Inspect {
            channel,
            identity,
            body,
        } => inspect(&channel, identity.as_deref(), body.as_deref()),
        Command::Seed { org_id } => seed(&org_id),
    }
}

fn inspect(
    channel_path: &std::path::Path,
    identity_path: Option<&std::path::Path>,
    body: Option<&str>,
) -> anyhow::Result<()> {
    let channel = load_channel(channel_path)?;
    let identity = match identity_path {
        Some(path) => load_identity(path)?,
        None => Identity::anonymous(),
    };

    let role = channel_role(&channel, &identity);
    println!("role: {}", role.as_str());
    println!("can_read_channel: {}", can_read_channel(&channel, &identity));
    let can_post = can_post_to_channel(&channel, &identity);
    println!("can_post_to_channel: {can_post}");
    println!(
        "can_reply_to_channel: {}",
        can_reply_to_channel(&channel, &identity)
    );
    println!(
        "can_moderate_channel: {}",
        can_moderate_channel(&channel, &identity)
    );
    println!(
        "can_edit_post_status: {}",
        can_edit_post_status(&channel, &identity)
    );
    println!("can_edit_channel: {}", can_edit_channel(&channel, &identity));
    println!(
        "can_delete_channel: {}",
        can_delete_channel(&channel, &identity)
    );
    println!(
        "can_create_reaction(thumbs_up): {}",
        can_create_reaction(&channel, Reaction::ThumbsUp, &identity)
    );
    if !can_post {
        println!(
            "post denial explained by blocked groups: {}",
            cannot_create_post_groups_blocked(&channel, &identity)
        );
    }
    if let Some(body) = body {
        let status = screen_post_body(&channel, body);
        println!("body screening: {}", serde_json::to_string(&status)?);
    }
    Ok(())
}

fn seed(org_id: &str) -> anyhow::Result<()> {
    let seed = agora_policy::default_channel(org_id);
    println!("{}", serde_json::to_string_pretty(&seed)?);
    Ok(())
}

fn load_channel(path: &std::path::Path) -> anyhow::Result<Channel> {
    let raw = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("cannot read channel file {}: {e}", path.display()))?;
    let record: ChannelRecordDto = serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("invalid channel record in {}: {e}", path.display()))?;
    let channel = Channel::try_from(record)?;
    tracing::debug!(
        event = "channel_loaded",
        org_id = channel.org_id.as_str(),
        "loaded channel record"
    );
    Ok(channel)
}

fn load_identity(path: &std::path::Path) -> anyhow::Result<Identity> {
    let raw = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("cannot read identity file {}: {e}", path.display()))?;
    let identity: Identity = serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("invalid identity in {}: {e}", path.display()))?;
    Ok(identity)
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
