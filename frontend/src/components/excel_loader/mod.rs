//! Spreadsheet loader page: root module wiring the Yew `Component`
//! implementation with submodules for state, update logic and view rendering.
//!
//! Responsibilities
//! - Own one `UploadOrchestrator` (and with it one progress channel) for the
//!   lifetime of the page, tearing it down when the page goes away.
//! - Delegate message handling to `update::update` and rendering to
//!   `view::view`.
//! - Load the uploaded files listing on first render.

use yew::prelude::*;

mod messages;
mod state;
mod update;
mod view;

use messages::Msg;
pub use state::ExcelLoader;

use crate::components::PageProps;

impl Component for ExcelLoader {
    type Message = Msg;
    type Properties = PageProps;

    fn create(ctx: &Context<Self>) -> Self {
        let services = &ctx.props().services;
        let uploads = services.upload_orchestrator();
        let link = ctx.link().clone();
        uploads.set_on_change(move || link.send_message(Msg::JobChanged));
        ExcelLoader::new(uploads, services.file_browser())
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            ctx.link().send_message(Msg::LoadFiles);
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.uploads.teardown();
    }
}
