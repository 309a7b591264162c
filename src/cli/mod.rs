//! # CLI Module
//!
//! User-facing commands. Each command receives the opened
//! [`Session`](crate::session::Session), calls into [`crate::spotify`], and
//! reports with the coloured output macros; fatal failures exit through
//! [`error!`](crate::error).
//!
//! ## Commands
//!
//! - [`auth`], [`logout`], [`status`] - credential lifecycle
//! - [`me`] - profile of the signed-in user
//! - [`albums`], [`album`], [`playlists`] - library
//! - [`search`], [`releases`], [`featured`], [`categories`], [`genres`],
//!   [`recommend`] - search and browse
//! - [`now_playing`], [`play`], [`pause`], [`next`], [`previous`] - playback
//!
//! ```bash
//! spotauth auth            # sign in through the browser
//! spotauth status          # show token state
//! spotauth search "kind of blue"
//! spotauth now-playing
//! spotauth playlists --create "Road trip"
//! ```

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    types::{Album, AlbumTableRow, Playlist, PlaylistTableRow, Track, TrackTableRow},
    utils,
};

mod auth;
mod browse;
mod library;
mod player;
mod profile;

pub use auth::auth;
pub use auth::logout;
pub use auth::status;
pub use browse::album;
pub use browse::categories;
pub use browse::featured;
pub use browse::genres;
pub use browse::recommend;
pub use browse::releases;
pub use browse::search;
pub use library::albums;
pub use library::playlists;
pub use player::next;
pub use player::now_playing;
pub use player::pause;
pub use player::play;
pub use player::previous;
pub use profile::me;

pub(crate) fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

pub(crate) fn album_rows(albums: Vec<Album>) -> Vec<AlbumTableRow> {
    albums
        .into_iter()
        .map(|a| AlbumTableRow {
            artists: utils::join_artist_names(&a.artists),
            released: a.release_date.unwrap_or_default(),
            id: a.id,
            name: a.name,
        })
        .collect()
}

pub(crate) fn playlist_row(p: Playlist) -> PlaylistTableRow {
    PlaylistTableRow {
        id: p.id,
        name: p.name,
        owner: p.owner.display_name.unwrap_or(p.owner.id),
        tracks: p
            .tracks
            .and_then(|t| t.total)
            .map(|total| total.to_string())
            .unwrap_or_default(),
    }
}

pub(crate) fn track_rows(tracks: Vec<Track>) -> Vec<TrackTableRow> {
    tracks
        .into_iter()
        .map(|track| TrackTableRow {
            name: track.name,
            artists: utils::join_artist_names(&track.artists),
            duration: track
                .duration_ms
                .map(utils::format_duration_ms)
                .unwrap_or_default(),
            uri: track.uri,
        })
        .collect()
}
