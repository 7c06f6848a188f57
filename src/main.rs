mod components;
mod error;
mod listeners;
mod model;
mod services;
mod state;
mod util;

use components::app::App;

fn main() {
    util::init_logging();
    tracing::info!("vnc overlay starting");
    yew::Renderer::<App>::new().render();
}
