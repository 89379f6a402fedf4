//! Turns one chat line into an authorized, type-checked handler invocation.
//!
//! Each dispatch walks a fixed, strictly sequential pipeline:
//!
//! ```text
//! Idle → Resolved → Authorized → Bound → Executed
//!   │        │           │          │        │
//!   └ NotFound  Unauthorized  ParseFailed  Handled | HandlerError
//! ```
//!
//! Every failure stage reports localized feedback to the actor. The handler runs
//! on its own tokio task, so an `Err` or a panic inside business logic is
//! contained, logged with full context, and surfaced as a generic failure; it
//! never escapes into the connection code or disturbs other dispatches.
use log::{debug, error, trace};
use std::sync::Arc;

use super::actor::Actor;
use super::binder::{bind, split_command, BoundArguments};
use super::errors::ParseError;
use super::gate;
use super::handler::{CommandContext, Services};
use super::registry::{CommandDescriptor, CommandRegistry};
use crate::logutil::escape_log;
use crate::metrics;

/// Terminal classification of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Handled,
    NotFound,
    Unauthorized,
    ParseFailed(ParseError),
    HandlerError,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Handled => "handled",
            Outcome::NotFound => "not_found",
            Outcome::Unauthorized => "unauthorized",
            Outcome::ParseFailed(_) => "parse_failed",
            Outcome::HandlerError => "handler_error",
        }
    }
}

/// Last pipeline stage an invocation reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Idle,
    Resolved,
    Authorized,
    Bound,
    Executed,
}

/// Record of one dispatch, alive only for the duration of the call.
#[derive(Debug, Clone)]
pub struct CommandInvocation {
    pub raw: String,
    /// Registered key of the resolved descriptor.
    pub key: Option<String>,
    pub arguments: Option<Result<BoundArguments, ParseError>>,
    pub stage: Stage,
    pub outcome: Outcome,
}

impl CommandInvocation {
    fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            key: None,
            arguments: None,
            stage: Stage::Idle,
            outcome: Outcome::NotFound,
        }
    }

    fn finish(mut self, outcome: Outcome) -> Self {
        metrics::record_outcome(self.key.as_deref(), &outcome);
        trace!(
            "dispatch '{}' ended at {:?}: {}",
            escape_log(&self.raw),
            self.stage,
            outcome.label()
        );
        self.outcome = outcome;
        self
    }
}

pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    services: Arc<Services>,
    prefix: char,
}

impl Dispatcher {
    pub const DEFAULT_PREFIX: char = '/';

    pub fn new(registry: Arc<CommandRegistry>, services: Arc<Services>) -> Self {
        Self {
            registry,
            services,
            prefix: Self::DEFAULT_PREFIX,
        }
    }

    pub fn with_prefix(mut self, prefix: char) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    pub fn services(&self) -> &Arc<Services> {
        &self.services
    }

    /// Keys are registered with [Self::DEFAULT_PREFIX]; players type the configured prefix.
    /// Feedback echoes keys back with the configured prefix too.
    fn canonical_key(&self, token: &str) -> String {
        match token.strip_prefix(self.prefix) {
            Some(name) if self.prefix != Self::DEFAULT_PREFIX => format!("{}{}", Self::DEFAULT_PREFIX, name),
            _ => token.to_string(),
        }
    }

    /// Whether `raw` should be routed here instead of to ordinary chat.
    pub fn is_command(&self, raw: &str) -> bool {
        raw.trim_start().starts_with(self.prefix)
    }

    pub async fn dispatch(&self, actor: &Actor, raw: &str) -> Outcome {
        self.invoke(actor, raw).await.outcome
    }

    /// Run the full pipeline and return the invocation record.
    pub async fn invoke(&self, actor: &Actor, raw: &str) -> CommandInvocation {
        let mut invocation = CommandInvocation::new(raw);
        let (token, rest) = split_command(raw);

        if !self.is_command(raw) {
            // Plain chat is not ours to answer.
            return invocation.finish(Outcome::NotFound);
        }

        let descriptor = match self.registry.resolve(&self.canonical_key(token)) {
            Some(d) => d,
            None => {
                debug!("unknown command {} from {}", escape_log(token), actor.name);
                self.feedback(actor, "command.not_found", &[("command", token)]);
                return invocation.finish(Outcome::NotFound);
            }
        };
        invocation.key = Some(descriptor.key().to_string());
        invocation.stage = Stage::Resolved;

        if let Err(denied) = gate::check(actor, descriptor) {
            debug!("{} denied for {}: {}", descriptor.key(), actor.name, denied);
            let command = descriptor.display_key(self.prefix);
            self.feedback(actor, "command.unauthorized", &[("command", &command)]);
            return invocation.finish(Outcome::Unauthorized);
        }
        invocation.stage = Stage::Authorized;

        let args = match bind(descriptor.arguments(), rest) {
            Ok(args) => args,
            Err(err) => {
                debug!("{} parse failed for {}: {}", descriptor.key(), actor.name, err);
                self.report_parse_error(actor, descriptor, &err);
                invocation.arguments = Some(Err(err.clone()));
                return invocation.finish(Outcome::ParseFailed(err));
            }
        };
        invocation.arguments = Some(Ok(args.clone()));
        invocation.stage = Stage::Bound;

        let outcome = self.execute(actor, descriptor, args, raw).await;
        invocation.stage = Stage::Executed;
        invocation.finish(outcome)
    }

    async fn execute(&self, actor: &Actor, descriptor: &CommandDescriptor, args: BoundArguments, raw: &str) -> Outcome {
        let ctx = CommandContext {
            actor: actor.clone(),
            key: descriptor.key().to_string(),
            args,
            prefix: self.prefix,
            configuration: descriptor.configuration().cloned(),
            registry: Arc::clone(&self.registry),
            services: Arc::clone(&self.services),
        };
        let handler = Arc::clone(descriptor.handler());
        let task = tokio::spawn(async move { handler.execute(ctx).await });

        let failure = match task.await {
            Ok(Ok(())) => return Outcome::Handled,
            Ok(Err(err)) => format!("{:#}", err),
            Err(join) if join.is_panic() => format!("handler panicked: {}", join),
            Err(join) => format!("handler task aborted: {}", join),
        };
        error!(
            "command {} failed (actor={} id={} raw='{}'): {}",
            descriptor.key(),
            actor.name,
            actor.id,
            escape_log(raw),
            failure
        );
        let command = descriptor.display_key(self.prefix);
        self.feedback(actor, "command.failed", &[("command", &command)]);
        Outcome::HandlerError
    }

    fn report_parse_error(&self, actor: &Actor, descriptor: &CommandDescriptor, err: &ParseError) {
        match err {
            ParseError::ArgumentMissing { field } => {
                self.feedback(actor, "argument.missing", &[("field", field)]);
            }
            ParseError::ArgumentInvalidType { field, raw } => {
                self.feedback(actor, "argument.invalid", &[("field", field), ("value", raw)]);
            }
            ParseError::ArgumentNotInAllowedSet { field, allowed } => {
                let allowed = allowed.join(", ");
                self.feedback(actor, "argument.not_allowed", &[("field", field), ("allowed", &allowed)]);
            }
            ParseError::UnexpectedArgument { token } => {
                self.feedback(actor, "argument.unexpected", &[("value", token)]);
            }
        }
        let usage = descriptor.usage_with_prefix(self.prefix);
        self.feedback(actor, "command.usage", &[("usage", &usage)]);
    }

    fn feedback(&self, actor: &Actor, key: &str, params: &[(&str, &str)]) {
        self.services.tell(actor.id, &actor.locale, key, params);
    }
}
