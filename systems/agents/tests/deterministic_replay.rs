use std::time::Duration;

use duskfall_core::{
    AgentKind, AgentSpawn, AgentState, Command, Event, GameConfig, GameStatus, GridMap,
};
use duskfall_system_agents::AgentBehaviour;
use duskfall_world::{self as world, query, Level, World};
use glam::Vec2;

const FRAME: Duration = Duration::from_millis(50);

/// Single-row corridor with the player at its west end.
fn arena(kind: AgentKind, agent_x: f32, config: GameConfig) -> (World, AgentBehaviour) {
    let mut config = config;
    config.player.start_x = 1.5;
    config.player.start_y = 1.5;
    let level = Level::new(
        GridMap::enclosed_room(14, 3),
        Vec::new(),
        vec![AgentSpawn {
            kind,
            position: Vec2::new(agent_x, 1.5),
        }],
    );
    let behaviour = AgentBehaviour::new(
        config.agents.seed,
        config.viewport(),
        config.raycasting.max_depth,
    );
    (World::new(level, &config), behaviour)
}

fn step(world: &mut World, behaviour: &mut AgentBehaviour, player: Vec<Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in player {
        world::apply(world, command, &mut events);
    }
    world::apply(world, Command::Tick { dt: FRAME }, &mut events);

    let mut commands = Vec::new();
    behaviour.handle(
        &events,
        &query::player(world),
        &query::agent_view(world),
        query::grid(world),
        &mut commands,
    );
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn replay(frames: usize) -> (Vec<Event>, Vec2, u32) {
    let (mut world, mut behaviour) = arena(AgentKind::Soldier, 12.5, GameConfig::default());
    let mut log = Vec::new();
    for _ in 0..frames {
        log.extend(step(&mut world, &mut behaviour, Vec::new()));
    }
    let agent = query::agent_view(&world)
        .iter()
        .next()
        .map(|agent| agent.position)
        .unwrap_or(Vec2::ZERO);
    (log, agent, query::player(&world).health)
}

#[test]
fn soldier_closes_in_and_attacks() {
    let (events, position, health) = replay(200);

    assert!(position.x < 6.0, "soldier should approach, stopped at {position:?}");
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::AgentAttacked { .. })));
    assert!(health <= 100);
}

#[test]
fn identical_seeds_replay_identically() {
    let first = replay(120);
    let second = replay(120);

    assert_eq!(first, second);
}

#[test]
fn shotgun_blasts_kill_agent_and_award_points() {
    let (mut world, mut behaviour) = arena(AgentKind::Soldier, 9.5, GameConfig::default());

    let mut killed = false;
    for _ in 0..40 {
        let events = step(&mut world, &mut behaviour, vec![Command::FireWeapon]);
        if events
            .iter()
            .any(|event| matches!(event, Event::AgentKilled { .. }))
        {
            killed = true;
            break;
        }
    }

    assert!(killed, "two shotgun hits should kill a soldier");
    assert_eq!(query::player(&world).score, AgentKind::Soldier.spec().points);
    let agents = query::agent_view(&world);
    assert!(agents.iter().all(|agent| agent.state == AgentState::Dead));
}

#[test]
fn cyberdemon_can_end_the_game() {
    let mut config = GameConfig::default();
    config.player.recovery_interval_ms = 60_000;
    let (mut world, mut behaviour) = arena(AgentKind::Cyberdemon, 5.5, config);

    for _ in 0..2_000 {
        let _ = step(&mut world, &mut behaviour, Vec::new());
        if query::status(&world) != GameStatus::Playing {
            break;
        }
    }

    assert!(matches!(
        query::status(&world),
        GameStatus::GameOver { score: 0 }
    ));
}
