//! # parlord — parlor console daemon
//!
//! Composition root that wires the in-memory registry and a demo intent
//! handler into the conversation agent, then serves a line-based console on
//! stdin/stdout: type a sentence, get the spoken answer back.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize logging
//! - Seed the in-memory registry with a demo home
//! - Construct the agent, injecting collaborators via port traits
//! - Read utterances from stdin and print responses
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no conversation logic belongs here.

mod config;

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use parlor_adapter_registry_mem::InMemoryRegistry;
use parlor_agent::grammar::BuiltinBundles;
use parlor_agent::ports::{HandlerResponse, IntentHandler, IntentInvocation};
use parlor_agent::{Agent, trigger};
use parlor_domain::area::Area;
use parlor_domain::device::Device;
use parlor_domain::entity::Entity;
use parlor_domain::response::Response;
use parlor_domain::state::EntityState;
use parlor_domain::utterance::Utterance;

use config::Config;

/// Demo handler: applies `TurnOn`/`TurnOff` to the registry and confirms.
struct ConsoleHandler {
    registry: Arc<InMemoryRegistry>,
}

impl IntentHandler for ConsoleHandler {
    async fn handle(&self, invocation: IntentInvocation) -> Result<HandlerResponse, anyhow::Error> {
        let state = match invocation.intent_type.as_str() {
            "TurnOn" => Some(EntityState::On),
            "TurnOff" => Some(EntityState::Off),
            _ => None,
        };
        if let Some(state) = state {
            for entity in &invocation.entities {
                self.registry.set_state(&entity.entity_id, state.clone());
            }
        }
        tracing::info!(
            intent = %invocation.intent_type,
            targets = invocation.entities.len(),
            "handled intent"
        );
        Ok(HandlerResponse::say(confirmation(&invocation)))
    }
}

fn confirmation(invocation: &IntentInvocation) -> String {
    match invocation.entities.as_slice() {
        [] => String::new(),
        [only] => format!("Done, {}", only.friendly_name),
        many => format!("Done, {} devices", many.len()),
    }
}

fn seed(registry: &InMemoryRegistry) -> Result<(), anyhow::Error> {
    let kitchen = Area::builder().name("Kitchen").build()?;
    let bedroom = Area::builder().name("Bedroom").alias("sleeping quarters").build()?;

    let speaker_shelf = Device::builder().name("Speaker shelf").area_id(kitchen.id).build()?;

    registry.add_entity(
        Entity::builder()
            .entity_id("light.kitchen_ceiling")
            .friendly_name("ceiling light")
            .area_id(kitchen.id)
            .build()?,
    );
    registry.add_entity(
        Entity::builder()
            .entity_id("light.bedside_lamp")
            .friendly_name("bedside lamp")
            .area_id(bedroom.id)
            .build()?,
    );
    registry.add_entity(
        Entity::builder()
            .entity_id("media_player.kitchen_speaker")
            .friendly_name("kitchen speaker")
            .device_id(speaker_shelf.id)
            .build()?,
    );

    registry.add_area(kitchen);
    registry.add_area(bedroom);
    registry.add_device(speaker_shelf);
    Ok(())
}

fn render(response: &Response) -> String {
    match response.plain_speech() {
        Some(speech) => speech.to_string(),
        None => "(no speech)".to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(config.logging.filter.as_str())
        .init();

    let registry = Arc::new(InMemoryRegistry::new());
    seed(&registry)?;

    let handler = ConsoleHandler {
        registry: Arc::clone(&registry),
    };
    let agent = Agent::new(Arc::clone(&registry), BuiltinBundles, handler, config.agent);

    let _goodnight = agent.register_trigger(
        ["good night", "time for bed"],
        trigger::callback(|_text| async { Ok("Sleep well!".to_string()) }),
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut lines = stdin.lines();

    stdout.write_all(b"parlord ready, say something:\n> ").await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            stdout.write_all(b"> ").await?;
            stdout.flush().await?;
            continue;
        }
        let utterance = Utterance {
            text: line,
            language: None,
            context: Default::default(),
        };
        let reply = match agent.converse(&utterance).await {
            Ok(response) => render(&response),
            Err(err) => {
                tracing::error!(error = %err, "conversation turn failed");
                format!("error: {err}")
            }
        };
        stdout.write_all(format!("{reply}\n> ").as_bytes()).await?;
        stdout.flush().await?;
    }

    Ok(())
}
