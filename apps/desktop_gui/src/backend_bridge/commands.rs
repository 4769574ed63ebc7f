//! Backend commands queued from UI to backend worker.

use shared::{domain::PostId, protocol::ContactRequest};

pub enum BackendCommand {
    ListPosts,
    FetchPost {
        post_id: PostId,
        /// Monotonic tag; the UI drops completions whose tag is no
        /// longer current, so a superseded fetch cannot overwrite a
        /// newer view.
        request_id: u64,
    },
    FetchThumbnail {
        post_id: PostId,
        url: String,
    },
    SubmitContact {
        request: ContactRequest,
    },
}
