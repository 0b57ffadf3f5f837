//! Autonomous agents driven through the full event loop.

use courier_core::actions;
use courier_core::ai::AiController;
use courier_core::ecs::Position;
use courier_core::jobs::JobBoard;
use courier_core::orders::OrderState;
use courier_core::test_helpers::{bot_agents, demo_session, pump_until_ms};

#[test]
fn bots_leave_the_human_a_priority_window() {
    let (mut world, mut schedule) = demo_session();

    // Before the 3 s eligibility delay no bot may hold a job.
    pump_until_ms(&mut world, &mut schedule, 2_900);
    for bot in bot_agents(&mut world) {
        let mut query = world.query::<&JobBoard>();
        let board = query.get(&world, bot).expect("bot");
        assert!(
            board.accepted_ids().is_empty(),
            "bot accepted a job inside the priority window"
        );
    }
}

#[test]
fn bots_accept_jobs_and_work_them() {
    let (mut world, mut schedule) = demo_session();
    pump_until_ms(&mut world, &mut schedule, 60_000);

    let bots = bot_agents(&mut world);
    assert_eq!(bots.len(), 2);

    let mut any_progress = false;
    for bot in bots {
        let mut query = world.query::<(&JobBoard, &Position, &AiController)>();
        let (board, position, controller) = query.get(&world, bot).expect("bot");
        let touched = board.orders().iter().any(|o| o.state != OrderState::Available
            || controller.target.is_some());
        if touched || position.tile() != (0, 0) {
            any_progress = true;
        }
    }
    assert!(any_progress, "after a minute some bot must have acted");
}

#[test]
fn each_bot_has_a_private_board() {
    let (mut world, mut schedule) = demo_session();
    pump_until_ms(&mut world, &mut schedule, 30_000);

    // The human's board still shows every order as available even if bots
    // accepted their own copies.
    let human = courier_core::test_helpers::human_agent(&mut world);
    let mut query = world.query::<&JobBoard>();
    let board = query.get(&world, human).expect("human");
    assert!(board
        .orders()
        .iter()
        .all(|o| o.state == OrderState::Available || o.state == OrderState::Expired));
}

#[test]
fn paused_session_freezes_bot_decisions() {
    let (mut world, mut schedule) = demo_session();
    pump_until_ms(&mut world, &mut schedule, 1_000);
    actions::set_paused(&mut world, true);

    let before: Vec<(i32, i32)> = {
        let bots = bot_agents(&mut world);
        bots.iter()
            .map(|&bot| {
                let mut query = world.query::<&Position>();
                query.get(&world, bot).expect("bot").tile()
            })
            .collect()
    };

    pump_until_ms(&mut world, &mut schedule, 20_000);

    let bots = bot_agents(&mut world);
    for (i, &bot) in bots.iter().enumerate() {
        let mut query = world.query::<(&Position, &JobBoard)>();
        let (position, board) = query.get(&world, bot).expect("bot");
        assert_eq!(position.tile(), before[i], "bot moved while paused");
        assert!(board.accepted_ids().is_empty(), "bot accepted while paused");
    }
}
