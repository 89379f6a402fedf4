use std::sync::Arc;

use chatcommand::command::dispatch::Stage;
use chatcommand::command::{
    ArgKind, CommandDescriptor, CommandRegistry, Dispatcher, Outcome, ParseError, Privilege, Schema,
};
use uuid::Uuid;

mod common;
use common::{shared, Broken, Harness, Recording};

struct Fixture {
    harness: Harness,
    addstr: Arc<Recording>,
    set: Arc<Recording>,
    pk: Arc<Recording>,
    clearinv: Arc<Recording>,
}

fn fixture() -> Fixture {
    let mut registry = CommandRegistry::new();

    let (addstr, handler) = shared(Recording::default());
    let schema = Schema::builder().required("amount", ArgKind::Unsigned).build().unwrap();
    registry
        .register(CommandDescriptor::new("/addstr", Uuid::from_u128(1), handler).schema(schema))
        .unwrap();

    let (set, handler) = shared(Recording::default());
    let schema = Schema::builder()
        .choice("stat", &["str", "agi", "vit", "ene", "cmd"])
        .required("amount", ArgKind::Unsigned)
        .required("character", ArgKind::Str)
        .build()
        .unwrap();
    registry
        .register(
            CommandDescriptor::new("/set", Uuid::from_u128(2), handler)
                .privilege(Privilege::GameMaster)
                .schema(schema),
        )
        .unwrap();

    let (pk, handler) = shared(Recording::default());
    let schema = Schema::builder()
        .required("level", ArgKind::Integer)
        .required("count", ArgKind::Integer)
        .required("character", ArgKind::Str)
        .build()
        .unwrap();
    registry
        .register(
            CommandDescriptor::new("/pk", Uuid::from_u128(3), handler)
                .privilege(Privilege::GameMaster)
                .schema(schema),
        )
        .unwrap();

    let (clearinv, handler) = shared(Recording::default());
    registry
        .register(CommandDescriptor::new("/clearinv", Uuid::from_u128(4), handler).disabled_by_default())
        .unwrap();

    registry
        .register(CommandDescriptor::new("/boom", Uuid::from_u128(5), Arc::new(Broken::Errors)))
        .unwrap();
    registry
        .register(CommandDescriptor::new("/crash", Uuid::from_u128(6), Arc::new(Broken::Panics)))
        .unwrap();

    Fixture {
        harness: Harness::with_registry(registry),
        addstr,
        set,
        pk,
        clearinv,
    }
}

#[tokio::test]
async fn handled_command_receives_typed_arguments() {
    let mut f = fixture();
    let bob = f.harness.player("Bob", Privilege::Normal).await;

    let outcome = f.harness.dispatcher.dispatch(&bob, "/addstr 50").await;
    assert_eq!(outcome, Outcome::Handled);
    assert_eq!(f.addstr.count(), 1);
    assert_eq!(f.addstr.last().unwrap().unsigned("amount").unwrap(), 50);
    assert!(f.harness.drain().is_empty());
}

#[tokio::test]
async fn keys_match_case_insensitively_and_whitespace_runs_collapse() {
    let f = fixture();
    let bob = f.harness.player("Bob", Privilege::Normal).await;

    let outcome = f.harness.dispatcher.dispatch(&bob, "  /ADDSTR    7   ").await;
    assert_eq!(outcome, Outcome::Handled);
    assert_eq!(f.addstr.last().unwrap().unsigned("amount").unwrap(), 7);
}

#[tokio::test]
async fn under_privileged_actor_never_reaches_handler() {
    let mut f = fixture();
    let bob = f.harness.player("Bob", Privilege::Normal).await;

    let invocation = f.harness.dispatcher.invoke(&bob, "/set ene 9999 Bob").await;
    assert_eq!(invocation.outcome, Outcome::Unauthorized);
    assert_eq!(invocation.stage, Stage::Resolved);
    assert!(invocation.arguments.is_none());
    assert_eq!(f.set.count(), 0);
    assert_eq!(f.harness.replies_to(&bob), vec!["You are not allowed to use /set.".to_string()]);
}

#[tokio::test]
async fn game_master_passes_the_gate() {
    let f = fixture();
    let gm = f.harness.player("Gm", Privilege::GameMaster).await;
    let admin = f.harness.player("Root", Privilege::Administrator).await;

    assert_eq!(f.harness.dispatcher.dispatch(&gm, "/set ENE 9999 Bob").await, Outcome::Handled);
    assert_eq!(f.harness.dispatcher.dispatch(&admin, "/set str 1 Bob").await, Outcome::Handled);
    assert_eq!(f.set.count(), 2);
    // Choice values bind to their canonical spelling.
    assert_eq!(f.set.calls.lock().unwrap()[0].1.text("stat").unwrap(), "ene");
}

#[tokio::test]
async fn first_bad_field_is_reported_with_usage() {
    let mut f = fixture();
    let gm = f.harness.player("Gm", Privilege::GameMaster).await;

    let outcome = f.harness.dispatcher.dispatch(&gm, "/pk abc 10 CharX").await;
    assert_eq!(
        outcome,
        Outcome::ParseFailed(ParseError::ArgumentInvalidType {
            field: "level".to_string(),
            raw: "abc".to_string(),
        })
    );
    assert_eq!(f.pk.count(), 0);
    assert_eq!(
        f.harness.replies_to(&gm),
        vec![
            "'abc' is not valid for level.".to_string(),
            "Usage: /pk <level> <count> <character>".to_string(),
        ]
    );
}

#[tokio::test]
async fn value_outside_allowed_set_is_rejected() {
    let mut f = fixture();
    let gm = f.harness.player("Gm", Privilege::GameMaster).await;

    let outcome = f.harness.dispatcher.dispatch(&gm, "/set luck 5 Bob").await;
    assert!(matches!(
        outcome,
        Outcome::ParseFailed(ParseError::ArgumentNotInAllowedSet { ref field, .. }) if field == "stat"
    ));
    assert_eq!(f.set.count(), 0);
    let replies = f.harness.replies_to(&gm);
    assert_eq!(replies[0], "stat must be one of: str, agi, vit, ene, cmd.");
}

#[tokio::test]
async fn missing_and_extra_arguments_fail_binding() {
    let f = fixture();
    let gm = f.harness.player("Gm", Privilege::GameMaster).await;

    let outcome = f.harness.dispatcher.dispatch(&gm, "/pk 1 2").await;
    assert_eq!(
        outcome,
        Outcome::ParseFailed(ParseError::ArgumentMissing {
            field: "character".to_string()
        })
    );

    let outcome = f.harness.dispatcher.dispatch(&gm, "/addstr 5 6").await;
    assert_eq!(
        outcome,
        Outcome::ParseFailed(ParseError::UnexpectedArgument { token: "6".to_string() })
    );
    assert_eq!(f.pk.count() + f.addstr.count(), 0);
}

#[tokio::test]
async fn disabled_command_is_not_found() {
    let mut f = fixture();
    let bob = f.harness.player("Bob", Privilege::Administrator).await;

    let outcome = f.harness.dispatcher.dispatch(&bob, "/clearinv").await;
    assert_eq!(outcome, Outcome::NotFound);
    assert_eq!(f.clearinv.count(), 0);
    assert_eq!(f.harness.replies_to(&bob), vec!["Unknown command /clearinv.".to_string()]);
}

#[tokio::test]
async fn unknown_command_gets_feedback_but_plain_chat_does_not() {
    let mut f = fixture();
    let bob = f.harness.player("Bob", Privilege::Normal).await;

    assert_eq!(f.harness.dispatcher.dispatch(&bob, "/addst 5").await, Outcome::NotFound);
    assert_eq!(f.harness.replies_to(&bob), vec!["Unknown command /addst.".to_string()]);

    assert_eq!(f.harness.dispatcher.dispatch(&bob, "hello there").await, Outcome::NotFound);
    assert!(f.harness.drain().is_empty());
}

#[tokio::test]
async fn failing_handlers_are_contained() {
    let mut f = fixture();
    let bob = f.harness.player("Bob", Privilege::Normal).await;

    let invocation = f.harness.dispatcher.invoke(&bob, "/boom").await;
    assert_eq!(invocation.outcome, Outcome::HandlerError);
    assert_eq!(invocation.stage, Stage::Executed);
    assert_eq!(
        f.harness.replies_to(&bob),
        vec!["/boom failed. Please try again later.".to_string()]
    );

    assert_eq!(f.harness.dispatcher.dispatch(&bob, "/crash").await, Outcome::HandlerError);
    assert_eq!(
        f.harness.replies_to(&bob),
        vec!["/crash failed. Please try again later.".to_string()]
    );

    // The dispatcher keeps serving after a panic.
    assert_eq!(f.harness.dispatcher.dispatch(&bob, "/addstr 1").await, Outcome::Handled);
}

#[tokio::test]
async fn configured_prefix_maps_onto_registered_keys() {
    let f = fixture();
    let bob = f.harness.player("Bob", Privilege::Normal).await;
    let dispatcher = Dispatcher::new(
        f.harness.dispatcher.registry().clone(),
        f.harness.dispatcher.services().clone(),
    )
    .with_prefix('!');

    assert_eq!(dispatcher.dispatch(&bob, "!addstr 3").await, Outcome::Handled);
    assert_eq!(dispatcher.dispatch(&bob, "/addstr 3").await, Outcome::NotFound);
    assert_eq!(f.addstr.count(), 1);
}

#[tokio::test]
async fn concurrent_dispatches_are_independent() {
    let f = fixture();
    let bob = f.harness.player("Bob", Privilege::Normal).await;
    let dispatcher = Arc::new(Dispatcher::new(
        f.harness.dispatcher.registry().clone(),
        f.harness.dispatcher.services().clone(),
    ));

    let mut tasks = Vec::new();
    for i in 0..32u32 {
        let dispatcher = dispatcher.clone();
        let bob = bob.clone();
        let line = if i % 2 == 0 { format!("/addstr {}", i) } else { "/boom".to_string() };
        tasks.push(tokio::spawn(async move { dispatcher.dispatch(&bob, &line).await }));
    }
    let mut handled = 0;
    for task in tasks {
        if task.await.unwrap() == Outcome::Handled {
            handled += 1;
        }
    }
    assert_eq!(handled, 16);
    assert_eq!(f.addstr.count(), 16);
}
