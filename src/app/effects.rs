use crate::app::fetcher::Fetcher;
use crate::app::{App, Message, Model, ToastLevel};

impl App {
    /// Run the I/O that a just-applied message asked for.
    ///
    /// `update` stays pure; any fetch it queued on the model is dispatched
    /// here, and messages with their own side effects are handled below.
    pub(super) fn handle_message_side_effects(model: &mut Model, fetcher: &Fetcher, msg: &Message) {
        if let Some(request) = model.take_pending_fetch() {
            fetcher.dispatch(request);
        }

        if matches!(msg, Message::OpenSelected) {
            Self::open_selected_image(model);
        }
    }

    fn open_selected_image(model: &mut Model) {
        let Some(record) = model.session.items().get(model.selected) else {
            return;
        };
        let url = record.full_image_url.clone();
        match open_external_link(&url) {
            Ok(()) => model.show_toast(ToastLevel::Success, format!("Opened {url}")),
            Err(err) => model.show_toast(ToastLevel::Error, format!("Open failed: {err}")),
        }
    }
}

fn open_external_link(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()?
            .wait()?;
        Ok(())
    }
    #[cfg(target_os = "windows")]
    {
        use std::process::Stdio;
        std::process::Command::new("cmd")
            .args(["/C", "start", "", url])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        return Ok(());
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()?
            .wait()?;
        Ok(())
    }
}
