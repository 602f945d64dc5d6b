use forbiddenblocks::{
    ConnectionChange, ConnectionContext, ForbiddenBlocks, Hand, InteractionDecider,
    InteractionTarget, ItemIdentity, ItemSnapshot, ScopeId, Tone,
};
use forbiddenblocks_testkit::{
    dirt, enchanted_sword, enchanted_sword_reordered, identity_of, key, tnt, TestGameDir,
};

fn place_on_grass(client: &ForbiddenBlocks, stack: &ItemSnapshot, ctx: &ConnectionContext) -> bool {
    client
        .on_interact_attempt(
            stack,
            ctx,
            Hand::Main,
            &InteractionTarget::block("minecraft:grass_block"),
        )
        .is_denied()
}

#[test]
fn forbid_then_allow_dirt_in_test_world() {
    let game = TestGameDir::new().expect("temp game dir");
    let client = ForbiddenBlocks::open(game.path());
    let ctx = ConnectionContext::singleplayer("TestWorld");
    client.on_connection_change(&ConnectionChange::Joined(ctx.clone()));

    let scope = client.resolve_scope(&ctx);
    assert_eq!(scope.as_str(), "singleplayer_TestWorld");
    assert!(client.current_store(&ctx).is_empty());

    let toggled = client.on_toggle_request(&dirt(), &ctx);
    assert!(toggled.now_forbidden);
    assert_eq!(
        toggled.message.expect("feedback enabled").text,
        "Dirt is now forbidden to place."
    );

    let outcome = client.on_interact_attempt(
        &dirt(),
        &ctx,
        Hand::Main,
        &InteractionTarget::block("minecraft:grass_block"),
    );
    assert!(outcome.is_denied());
    let message = outcome.message.expect("denial message");
    assert_eq!(message.tone, Tone::Error);
    assert_eq!(message.text, "You cannot place Dirt!");

    let toggled = client.on_toggle_request(&dirt(), &ctx);
    assert!(!toggled.now_forbidden);
    assert_eq!(toggled.message.expect("feedback").tone, Tone::Success);
    assert!(!place_on_grass(&client, &dirt(), &ctx));
}

#[test]
fn direct_facade_toggle_matches_literal_identity() {
    let game = TestGameDir::new().expect("temp game dir");
    let client = ForbiddenBlocks::open(game.path());
    let scope = ScopeId::singleplayer("TestWorld");
    let a = ItemIdentity::new("minecraft:dirt", "Dirt", "");

    assert!(!client.is_forbidden(&a, &scope));
    assert!(client.toggle(&a, &scope));
    assert!(client.is_forbidden(&a, &scope));
    assert!(!client.toggle(&a, &scope));
    assert!(!client.is_forbidden(&a, &scope));
}

#[test]
fn scopes_do_not_leak_into_each_other() {
    let game = TestGameDir::new().expect("temp game dir");
    let client = ForbiddenBlocks::open(game.path());
    let world = ConnectionContext::singleplayer("Alpha");
    let server = ConnectionContext::server("example.com:25565");

    client.on_toggle_request(&tnt(), &world);

    assert!(place_on_grass(&client, &tnt(), &world));
    assert!(!place_on_grass(&client, &tnt(), &server));
    assert_eq!(
        client.resolve_scope(&server),
        ScopeId::from_raw("multiplayer_example.com_25565")
    );
}

#[test]
fn reordered_components_match_the_same_entry() {
    let game = TestGameDir::new().expect("temp game dir");
    let client = ForbiddenBlocks::open(game.path());
    let ctx = ConnectionContext::singleplayer("Alpha");

    client.on_toggle_request(&enchanted_sword(), &ctx);
    assert!(place_on_grass(&client, &enchanted_sword_reordered(), &ctx));
    assert_eq!(
        identity_of(&enchanted_sword()),
        identity_of(&enchanted_sword_reordered())
    );
}

#[test]
fn list_survives_restart_and_reconnect() {
    let game = TestGameDir::new().expect("temp game dir");
    let ctx = ConnectionContext::server("play.example.net:25565");

    {
        let client = ForbiddenBlocks::open(game.path());
        client.on_connection_change(&ConnectionChange::Joined(ctx.clone()));
        client.on_toggle_request(&tnt(), &ctx);
        client.on_connection_change(&ConnectionChange::Left);
        client.on_shutdown();
    }

    let client = ForbiddenBlocks::open(game.path());
    client.on_connection_change(&ConnectionChange::Joined(ctx.clone()));
    assert!(place_on_grass(&client, &tnt(), &ctx));

    let records = game
        .read_scope_records(&ScopeId::multiplayer("play.example.net:25565"))
        .expect("scope file");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["registryId"], "minecraft:tnt");
}

#[test]
fn callbacks_without_live_context_use_joined_scope() {
    let game = TestGameDir::new().expect("temp game dir");
    let client = ForbiddenBlocks::open(game.path());
    let joined = ConnectionContext::server("mc.example.org");
    client.on_connection_change(&ConnectionChange::Joined(joined.clone()));

    client.on_toggle_request(&dirt(), &ConnectionContext::Disconnected);
    assert!(place_on_grass(&client, &dirt(), &joined));

    client.on_connection_change(&ConnectionChange::Left);
    assert!(client.resolve_scope(&ConnectionContext::Disconnected).is_unknown());
    assert!(!place_on_grass(&client, &dirt(), &ConnectionContext::Disconnected));
}

#[test]
fn exempt_targets_and_off_hand() {
    let game = TestGameDir::new().expect("temp game dir");
    let client = ForbiddenBlocks::open(game.path());
    let ctx = ConnectionContext::singleplayer("Alpha");
    client.on_toggle_request(&tnt(), &ctx);

    let door = InteractionTarget::block("minecraft:oak_door");
    let main = client.on_interact_attempt(&tnt(), &ctx, Hand::Main, &door);
    assert!(main.forbidden);
    assert!(main.bypassed);
    assert!(!main.is_denied());
    assert!(main.message.is_none());

    let off = client.on_interact_attempt(&tnt(), &ctx, Hand::Off, &door);
    assert!(off.is_denied());

    let minecart = InteractionTarget::Entity {
        entity: "minecraft:minecart".into(),
        name: "Minecart".into(),
        living: false,
    };
    let outcome = client.on_interact_attempt(&tnt(), &ctx, Hand::Main, &minecart);
    assert!(outcome.is_denied());
    assert_eq!(
        outcome.message.expect("message").text,
        "Action with TNT on Minecart is blocked!"
    );
}

#[test]
fn corrupt_scope_file_is_recoverable() {
    let game = TestGameDir::new().expect("temp game dir");
    let scope = ScopeId::singleplayer("TestWorld");
    game.write_scope_file(&scope, "[{ oops").expect("write");

    let client = ForbiddenBlocks::open(game.path());
    let ctx = ConnectionContext::singleplayer("TestWorld");
    assert!(!place_on_grass(&client, &dirt(), &ctx));

    assert!(client.on_toggle_request(&dirt(), &ctx).now_forbidden);
    let records = game.read_scope_records(&scope).expect("rewritten file");
    assert_eq!(records.len(), 1);
}

#[test]
fn unregistered_stack_fails_open() {
    let game = TestGameDir::new().expect("temp game dir");
    let client = ForbiddenBlocks::open(game.path());
    let ctx = ConnectionContext::singleplayer("Alpha");
    let mut stack = dirt();
    stack.item = None;

    let outcome = client.on_interact_attempt(
        &stack,
        &ctx,
        Hand::Main,
        &InteractionTarget::block("minecraft:stone"),
    );
    assert!(!outcome.is_denied());
    assert!(outcome.identity.is_none());

    client.on_toggle_request(&dirt(), &ctx);
    let mut coarse = dirt();
    coarse.item = Some(key("coarse_dirt"));
    assert!(!place_on_grass(&client, &coarse, &ctx));
    assert!(place_on_grass(&client, &dirt(), &ctx));
}

#[test]
fn message_toggle_is_saved_in_the_settings_file() {
    let game = TestGameDir::new().expect("temp game dir");
    let client = ForbiddenBlocks::open(game.path());
    assert_eq!(client.settings().path(), game.settings_file().as_path());
    assert!(!game.settings_file().exists());

    let (show, message) = client.toggle_show_messages();
    assert!(!show);
    assert_eq!(message.text, "ForbiddenBlocks messages disabled");

    let saved = std::fs::read_to_string(game.settings_file()).expect("settings file");
    assert!(saved.contains("show_messages = false"));
    assert!(!ForbiddenBlocks::open(game.path()).show_messages());
}
