use tokio::time::sleep;

use elevatorsim::building;
use elevatorsim::config::{self, SimConfig};
use elevatorsim::init;
use elevatorsim::lifecycle;
use elevatorsim::print;
use elevatorsim::state_store;

#[tokio::main]
async fn main() {
    let sim_config = init::parse_args();

    print::info("Starting the elevator simulator...".to_string());

    let initial_state = init::initialize_building(sim_config);

/* START ----------- Init of channels used to update the state watch ---------------------- */
    let main_mpscs = state_store::Mpscs::new();
    let watches = state_store::Watches::new(initial_state.clone());
    let (chime_tx, chime_rx) = state_store::chime_channel();

    // Separate the mpsc Rx's so they can be sent to [state_store::update_state_watch]
    let mpsc_rxs = main_mpscs.rxs;
    // Separate the mpsc Tx's so they can be sent to their designated tasks
    let call_tx = main_mpscs.txs.call;
    let arrival_tx = main_mpscs.txs.arrival;
    let dwell_tx = main_mpscs.txs.dwell;
    let new_config_tx = main_mpscs.txs.new_config;

    let state_tx = watches.state_tx;
/* END ----------- Init of channels used to update the state watch ---------------------- */

/* START ----------- Start critical tasks ----------- */
    {
        // Task that continuously updates the building state
        let _update_state_task = tokio::spawn(async move {
            print::info("Starting to update the building state".to_string());
            state_store::update_state_watch(mpsc_rxs, state_tx, chime_tx, initial_state).await;
        });
    }
    {
        // Task that arms and fires the elevator travel/dwell timers
        let state_watch_rx = watches.state_rx.clone();
        let _lifecycle_task = tokio::spawn(async move {
            print::info("Starting the lifecycle driver".to_string());
            lifecycle::run_lifecycle_driver(state_watch_rx, arrival_tx, dwell_tx).await;
        });
    }
    {
        // Task that plays the arrival chime
        let _chime_task = tokio::spawn(async move {
            print::info("Starting the arrival chime".to_string());
            lifecycle::chime::run_chime(chime_rx).await;
        });
    }
/* END ----------- Start critical tasks ----------- */

    // Task that prints the building state
    {
        let state_watch_rx = watches.state_rx.clone();
        let _print_task = tokio::spawn(async move {
            let mut state = building::get_state(&state_watch_rx);
            print::building(&state);
            loop {
                if building::update_state(&state_watch_rx, &mut state).await {
                    print::building(&state);
                }
                sleep(config::RENDER_PERIOD).await;
            }
        });
    }

/* START ----------- Scripted call scenario ---------------------- */
    let grace = sim_config.call_grace_period;

    state_store::call_elevator(&call_tx, 5, grace).await;
    state_store::call_elevator(&call_tx, 2, grace).await;
    sleep(std::time::Duration::from_secs(2)).await;
    state_store::call_elevator(&call_tx, 8, grace).await;
    state_store::call_elevator(&call_tx, 8, grace).await; // Redundant, absorbed
    sleep(std::time::Duration::from_secs(8)).await;

    // Shrink the building mid-run, resetting everything
    print::info("Requesting a smaller building".to_string());
    let _ = new_config_tx
        .send(SimConfig {
            floor_count: 6,
            elevator_count: 2,
            ..sim_config
        })
        .await;

    state_store::call_elevator(&call_tx, 4, grace).await;
    state_store::call_elevator(&call_tx, 1, grace).await;

    // Let the last trips finish, then dump the snapshot for inspection
    sleep(std::time::Duration::from_secs(6)).await;
    match print::building_json(&building::get_state(&watches.state_rx)) {
        Ok(json) => print::info(format!("Final snapshot:\n{}", json)),
        Err(e) => print::err(format!("Snapshot dump failed: {}", e)),
    }
/* END ----------- Scripted call scenario ---------------------- */

    // Keep the program from terminating
    loop {
        tokio::task::yield_now().await;
    }
}
