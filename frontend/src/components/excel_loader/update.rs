//! Update function for the spreadsheet loader page.
//!
//! Every asynchronous operation runs on `spawn_local` and reports back with a
//! follow-up message; the client objects hold the actual state, so most
//! follow-ups only ask for a re-render.

use client::upload::validate_file_name;
use client::SelectedFile;
use gloo_file::futures::read_as_bytes;
use log::{debug, warn};
use yew::platform::spawn_local;
use yew::prelude::*;

use super::messages::{Msg, Tab};
use super::state::ExcelLoader;
use crate::helpers::show_toast;

pub fn update(component: &mut ExcelLoader, ctx: &Context<ExcelLoader>, msg: Msg) -> bool {
    let link = ctx.link().clone();
    match msg {
        Msg::SetTab(tab) => {
            if component.active_tab == tab {
                return false;
            }
            component.active_tab = tab;
            if tab == Tab::Files {
                link.send_message(Msg::LoadFiles);
            }
            true
        }
        Msg::FileChosen(None) => {
            component.dragging = false;
            component.uploads.select_file(None).ok();
            true
        }
        Msg::FileChosen(Some(file)) => {
            component.dragging = false;
            let name = file.name();
            // Reject by extension before reading the whole file.
            if validate_file_name(&name).is_err() {
                component
                    .uploads
                    .select_file(Some(SelectedFile::new(name, Vec::new())))
                    .ok();
                return true;
            }
            component.reading = true;
            spawn_local(async move {
                let blob = gloo_file::File::from(file);
                match read_as_bytes(&blob).await {
                    Ok(bytes) => link.send_message(Msg::FileRead(SelectedFile::new(name, bytes))),
                    Err(e) => link.send_message(Msg::FileReadFailed(e.to_string())),
                }
            });
            true
        }
        Msg::FileRead(file) => {
            component.reading = false;
            debug!("read {} ({} bytes)", file.name, file.size);
            component.uploads.select_file(Some(file)).ok();
            true
        }
        Msg::FileReadFailed(reason) => {
            component.reading = false;
            warn!("could not read the selected file: {}", reason);
            show_toast("No se pudo leer el archivo");
            true
        }
        Msg::SetDragging(dragging) => {
            let changed = component.dragging != dragging;
            component.dragging = dragging;
            changed
        }
        Msg::ClearFile => {
            component.uploads.clear_file();
            true
        }
        Msg::Upload => {
            let uploads = component.uploads.clone();
            spawn_local(async move {
                let succeeded = uploads.upload().await.is_ok();
                link.send_message(Msg::UploadFinished(succeeded));
            });
            false
        }
        Msg::UploadFinished(succeeded) => {
            if succeeded {
                link.send_message(Msg::LoadFiles);
            }
            true
        }
        Msg::JobChanged => true,
        Msg::Reset => {
            component.uploads.reset();
            true
        }
        Msg::LoadFiles => {
            let files = component.files.clone();
            spawn_local(async move {
                if files.load_files().await.is_err() {
                    show_toast("Error al cargar archivos");
                }
                link.send_message(Msg::FilesChanged);
            });
            true
        }
        Msg::FilesChanged => true,
        Msg::ChangePage(page) => {
            let files = component.files.clone();
            spawn_local(async move {
                if let Ok(true) = files.change_page(page).await {
                    link.send_message(Msg::FilesChanged);
                }
            });
            false
        }
        Msg::DeleteFile(file_name) => {
            let files = component.files.clone();
            spawn_local(async move {
                files.delete_file(&file_name).await.ok();
                link.send_message(Msg::FilesChanged);
            });
            false
        }
        Msg::DeleteAll => {
            let files = component.files.clone();
            spawn_local(async move {
                files.delete_all().await.ok();
                link.send_message(Msg::FilesChanged);
            });
            false
        }
        Msg::Download(file_name) => {
            let services = &ctx.props().services;
            services
                .downloader
                .download(&services.gateway.excel.download_url(&file_name));
            false
        }
    }
}
