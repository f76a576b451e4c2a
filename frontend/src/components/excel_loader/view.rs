//! View rendering for the spreadsheet loader page.
//!
//! Two tabs: "Cargar" (drop zone, progress bar and result of the current
//! job) and "Gestionar" (uploaded files plus a paginated table of the
//! imported rows).

use client::file_records::PageLink;
use common::jobs::UploadStatus;
use num_format::{Locale, ToFormattedString};
use web_sys::{DragEvent, HtmlInputElement};
use yew::html::Scope;
use yew::prelude::*;

use super::messages::{Msg, Tab};
use super::state::ExcelLoader;

pub fn view(component: &ExcelLoader, ctx: &Context<ExcelLoader>) -> Html {
    let link = ctx.link();
    html! {
        <div class="excel-loader">
            { build_tab_bar(component, link) }
            {
                match component.active_tab {
                    Tab::Upload => build_upload_tab(component, link),
                    Tab::Files => build_files_tab(component, link),
                }
            }
        </div>
    }
}

fn build_tab_bar(component: &ExcelLoader, link: &Scope<ExcelLoader>) -> Html {
    let tab = |tab: Tab, label: &str| {
        let class = classes!("tab", (component.active_tab == tab).then_some("active"));
        html! {
            <button {class} onclick={link.callback(move |_| Msg::SetTab(tab))}>
                { label.to_string() }
            </button>
        }
    };
    html! {
        <div class="tab-bar">
            { tab(Tab::Upload, "Cargar archivo") }
            { tab(Tab::Files, "Gestionar archivos") }
        </div>
    }
}

fn first_file(files: Option<web_sys::FileList>) -> Option<web_sys::File> {
    files.and_then(|list| list.get(0))
}

fn build_drop_zone(component: &ExcelLoader, link: &Scope<ExcelLoader>) -> Html {
    let input_ref = component.file_input_ref.clone();
    let open_picker = Callback::from(move |_: MouseEvent| {
        if let Some(input) = input_ref.cast::<HtmlInputElement>() {
            input.click();
        }
    });
    let on_change = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let file = first_file(input.files());
        // Let the same file be picked again after a reset.
        input.set_value("");
        Msg::FileChosen(file)
    });
    let on_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });
    let on_drag_leave = link.callback(|_: DragEvent| Msg::SetDragging(false));
    let on_drop = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::FileChosen(first_file(e.data_transfer().and_then(|t| t.files())))
    });

    let class = classes!("drop-zone", component.dragging.then_some("dragging"));
    html! {
        <div {class}
            onclick={open_picker}
            ondragover={on_drag_over}
            ondragleave={on_drag_leave}
            ondrop={on_drop}>
            <i class="material-icons">{ "cloud_upload" }</i>
            <p>{ "Arrastra tu archivo aquí o haz clic para seleccionarlo" }</p>
            <small>{ "Formatos permitidos: .xls, .xlsx" }</small>
            <input
                ref={component.file_input_ref.clone()}
                type="file"
                accept=".xls,.xlsx"
                style="display: none"
                onchange={on_change}
            />
        </div>
    }
}

fn build_upload_tab(component: &ExcelLoader, link: &Scope<ExcelLoader>) -> Html {
    let job = component.uploads.job();
    let busy = job.is_uploading() || component.reading;
    let finished = matches!(job.status, UploadStatus::Success | UploadStatus::Error);

    html! {
        <div class="upload-tab">
            { build_drop_zone(component, link) }
            if component.reading {
                <p>{ "Leyendo archivo..." }</p>
            }
            if job.has_file {
                <div class="file-info">
                    <i class="material-icons">{ "description" }</i>
                    <span>{ job.file_name.clone() }</span>
                    <span class="text-muted">{ job.file_size.clone() }</span>
                    <button class="icon-btn" disabled={busy}
                        onclick={link.callback(|_| Msg::ClearFile)}>
                        <i class="material-icons">{ "close" }</i>
                    </button>
                </div>
            }
            if job.is_uploading() || job.status == UploadStatus::Success {
                <div class="progress">
                    <div class="progress-bar" style={format!("width: {}%", job.progress)}>
                        { format!("{}%", job.progress) }
                    </div>
                </div>
            }
            if !job.error_message.is_empty() {
                <div class="alert alert-danger">{ job.error_message.clone() }</div>
            }
            if !job.success_message.is_empty() {
                <div class="alert alert-success">
                    { job.success_message.clone() }
                    <small>
                        { format!(" ({} filas)", job.rows_processed.to_formatted_string(&Locale::es)) }
                    </small>
                </div>
            }
            <div class="actions">
                <button class="primary" disabled={busy || !job.has_file}
                    onclick={link.callback(|_| Msg::Upload)}>
                    { if job.is_uploading() { "Cargando..." } else { "Cargar archivo" } }
                </button>
                if finished {
                    <button onclick={link.callback(|_| Msg::Reset)}>{ "Nueva carga" }</button>
                }
            </div>
        </div>
    }
}

fn build_files_tab(component: &ExcelLoader, link: &Scope<ExcelLoader>) -> Html {
    let files = component.files.files();
    html! {
        <div class="files-tab">
            <div class="toolbar">
                <h3>{ format!("Archivos cargados ({})", files.len()) }</h3>
                <button class="danger" disabled={files.is_empty()}
                    onclick={link.callback(|_| Msg::DeleteAll)}>
                    { "Eliminar todos los datos" }
                </button>
            </div>
            if component.files.is_loading_files() {
                <p>{ "Cargando archivos..." }</p>
            } else if files.is_empty() {
                <p>{ "No hay archivos cargados" }</p>
            } else {
                <table class="table">
                    <thead>
                        <tr>
                            <th>{ "Archivo" }</th>
                            <th>{ "Tamaño" }</th>
                            <th>{ "Modificado" }</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        { for files.iter().map(|file| {
                            let download = file.filename.clone();
                            let delete = file.filename.clone();
                            html! {
                                <tr key={file.filename.clone()}>
                                    <td>{ file.filename.clone() }</td>
                                    <td>{ format!("{} MB", file.size_mb) }</td>
                                    <td>{ file.modified_at.clone().unwrap_or_default() }</td>
                                    <td>
                                        <button class="icon-btn" title="Descargar"
                                            onclick={link.callback(move |_| Msg::Download(download.clone()))}>
                                            <i class="material-icons">{ "download" }</i>
                                        </button>
                                        <button class="icon-btn" title="Eliminar"
                                            onclick={link.callback(move |_| Msg::DeleteFile(delete.clone()))}>
                                            <i class="material-icons">{ "delete" }</i>
                                        </button>
                                    </td>
                                </tr>
                            }
                        }) }
                    </tbody>
                </table>
                { build_data_table(component, link) }
            }
        </div>
    }
}

fn cell_text(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn build_data_table(component: &ExcelLoader, link: &Scope<ExcelLoader>) -> Html {
    let columns = component.files.columns();
    let rows = component.files.rows();
    let total = component.files.total();

    html! {
        <div class="data-table">
            <h3>{ format!("Datos ({} registros)", total.to_formatted_string(&Locale::es)) }</h3>
            <table class="table">
                <thead>
                    <tr>{ for columns.iter().map(|c| html! { <th>{ c.clone() }</th> }) }</tr>
                </thead>
                <tbody>
                    { for rows.iter().map(|row| html! {
                        <tr key={row.id}>
                            { for columns.iter().map(|c| html! {
                                <td>{ cell_text(row.columns.get(c)) }</td>
                            }) }
                        </tr>
                    }) }
                </tbody>
            </table>
            { build_pagination(component, link) }
        </div>
    }
}

fn build_pagination(component: &ExcelLoader, link: &Scope<ExcelLoader>) -> Html {
    let current = component.files.current_page();
    let last = component.files.total_pages();
    if last <= 1 {
        return html! {};
    }

    html! {
        <nav class="pagination">
            <button disabled={current <= 1}
                onclick={link.callback(move |_| Msg::ChangePage(current.saturating_sub(1)))}>
                { "Anterior" }
            </button>
            { for component.files.page_window().into_iter().map(|entry| match entry {
                PageLink::Gap => html! { <span class="gap">{ "..." }</span> },
                PageLink::Page(page) => {
                    let class = classes!("page", (page == current).then_some("active"));
                    html! {
                        <button {class} onclick={link.callback(move |_| Msg::ChangePage(page))}>
                            { page }
                        </button>
                    }
                }
            }) }
            <button disabled={current >= last}
                onclick={link.callback(move |_| Msg::ChangePage(current + 1))}>
                { "Siguiente" }
            </button>
        </nav>
    }
}
