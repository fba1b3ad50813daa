use log::debug;

use super::Browser;
use crate::preview::PreviewState;
use crate::tree::TreePath;

impl Browser {
    /// Fetch a leaf and show it in the preview pane. Failures are shown in
    /// the pane itself; a newer open supersedes this one.
    pub async fn open_file(&self, path: &TreePath) -> bool {
        let (generation, epoch, scope) = {
            let mut state = self.state_mut();
            let scope = state.session.scope_for(path.collection());
            let generation = state.preview.begin(path.clone());
            (generation, state.session.epoch(), scope)
        };
        let Some(scope) = scope else {
            return self.state_mut().preview.finish(
                generation,
                PreviewState::Failed {
                    path: path.clone(),
                    message: "not connected".to_string(),
                },
            );
        };

        debug!("fetching {path}");
        let fetched = self.remote.fetch_file(&scope, &path.relative()).await;

        let mut state = self.state_mut();
        if !state.session.is_current(epoch) {
            return false;
        }
        let preview = match fetched {
            Ok(file) => {
                debug!("{path}: {} bytes of {}", file.bytes.len(), file.content_type);
                PreviewState::Ready(self.dispatcher.dispatch(path.clone(), file))
            }
            Err(err) => {
                debug!("fetching {path} failed: {err}");
                PreviewState::Failed {
                    path: path.clone(),
                    message: err.to_string(),
                }
            }
        };
        state.preview.finish(generation, preview)
    }

    pub fn close_preview(&self) {
        self.state_mut().preview.clear();
    }
}
