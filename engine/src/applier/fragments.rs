use super::report::{FragmentReport, FragmentStatus};
use crate::common::errors::SourceError;
use crate::page::{FragmentSlot, Page};
use crate::source::FetchResponse;

const CONTAINER_OPEN: &str = "<div class=\"container\">";
const CONTAINER_PREFIXES: [&str; 2] = ["<div class=\"container\"", "<div class='container"];

/// Whether the fragment already starts with the standard container.
pub fn has_container_wrapper(content: &str) -> bool {
    let trimmed = content.trim();
    CONTAINER_PREFIXES
        .iter()
        .any(|prefix| trimmed.starts_with(prefix))
}

/// Wraps non-blank content in `<div class="container">` once.
pub fn wrap_fragment(content: &str) -> String {
    if needs_wrapper(content) {
        format!("{CONTAINER_OPEN}{content}</div>")
    } else {
        content.to_string()
    }
}

fn needs_wrapper(content: &str) -> bool {
    !content.trim().is_empty() && !has_container_wrapper(content)
}

/// Writes a fetched fragment into its container.
///
/// Missing or failed fragments clear the container so nothing of the
/// previous theme stays behind.
pub(crate) fn inject_fragment<P: Page + ?Sized>(
    page: &mut P,
    slot: &FragmentSlot,
    path: &str,
    fetched: Result<FetchResponse, SourceError>,
) -> FragmentReport {
    let status = match fetched {
        Ok(response) if response.is_success() => {
            let wrapped = slot.wrap && needs_wrapper(&response.body);
            let html = if wrapped {
                wrap_fragment(&response.body)
            } else {
                response.body
            };
            match page.set_inner_html(&slot.container_id, &html) {
                Ok(()) => {
                    if wrapped {
                        log::info!("#{} loaded and wrapped in .container", slot.container_id);
                    } else {
                        log::info!("#{} loaded", slot.container_id);
                    }
                    FragmentStatus::Injected { wrapped }
                }
                Err(e) => {
                    log::warn!("Fragment {path} skipped: {e}");
                    FragmentStatus::Skipped
                }
            }
        }
        Ok(response) => {
            log::info!(
                "{path} not found (status {}), clearing #{}",
                response.status,
                slot.container_id
            );
            clear_container(page, slot)
        }
        Err(e) => {
            log::warn!("Failed to load {path}: {e}, clearing #{}", slot.container_id);
            clear_container(page, slot)
        }
    };

    FragmentReport {
        container_id: slot.container_id.clone(),
        file: slot.file.clone(),
        status,
    }
}

fn clear_container<P: Page + ?Sized>(page: &mut P, slot: &FragmentSlot) -> FragmentStatus {
    match page.set_inner_html(&slot.container_id, "") {
        Ok(()) => FragmentStatus::Cleared,
        Err(e) => {
            log::warn!("Could not clear container: {e}");
            FragmentStatus::Skipped
        }
    }
}
