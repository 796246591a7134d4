//! Room Finder web front end.
//!
//! With the `server` feature this binary serves the fullstack app; the web
//! build launches the client and hydrates it.

fn main() {
    #[cfg(feature = "server")]
    {
        if let Err(e) = roomfinder_web::server::run() {
            tracing::error!("Server stopped: {:#}", e);
            eprintln!("roomfinder-web: {:#}", e);
            std::process::exit(1);
        }
    }

    #[cfg(not(feature = "server"))]
    {
        dioxus::launch(roomfinder_web::app::App);
    }
}
