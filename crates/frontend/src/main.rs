mod api;
mod browser;
mod components;
mod pages;
mod viewport;

use dioxus::prelude::*;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[route("/")]
    Home {},
    #[route("/spaces")]
    Spaces {},
}

#[component]
fn Home() -> Element {
    rsx! {
        pages::explorer::Explorer {}
    }
}

#[component]
fn Spaces() -> Element {
    rsx! {
        pages::explorer::Explorer {}
    }
}

const CSS: Asset = asset!("/assets/main.css");
const FAVICON: Asset = asset!("/assets/favicon.svg");

#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Stylesheet { href: CSS }
        document::Title { "SpotLight · Ad spaces near you" }
        Router::<Route> {}
    }
}

fn main() {
    dioxus::logger::initialize_default();
    launch(App);
}
