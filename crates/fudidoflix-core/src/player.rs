//! Details/player modal orchestration.
//!
//! [`reduce`] is a pure transition function from `(state, action)` to the
//! next state plus a list of [`Effect`]s. [`ModalManager`] owns the state,
//! performs the effects (fetches, storage writes, embed changes) and feeds
//! their results back in as new actions.

use fudidoflix_config::PlayerConfig;
use fudidoflix_models::{EntryDraft, MediaId, MediaKind, PosterEntry};
use fudidoflix_tmdb::{api, MetadataSource, SeasonSummary};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, warn};
use crate::details::{load_details, load_trailer, DetailsView};
use crate::episodes::{episode_rows, initial_season, EpisodeRow, SeasonCache};
use crate::error::CoreError;
use crate::request::{RequestScope, RequestToken, View};
use crate::store::keys;
use crate::watch_store::WatchStore;

/// What the embedded player should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackTarget {
    pub id: MediaId,
    pub kind: MediaKind,
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

impl PlaybackTarget {
    pub fn movie(id: MediaId) -> Self {
        Self {
            id,
            kind: MediaKind::Movie,
            season: None,
            episode: None,
        }
    }

    pub fn episode(id: MediaId, season: u32, episode: u32) -> Self {
        Self {
            id,
            kind: MediaKind::Tv,
            season: Some(season),
            episode: Some(episode),
        }
    }

    /// Movies ignore season/episode; series need both, starting at 1.
    pub fn new(id: MediaId, kind: MediaKind, season: Option<u32>, episode: Option<u32>) -> Self {
        match kind {
            MediaKind::Movie => Self::movie(id),
            MediaKind::Tv => Self {
                id,
                kind,
                season,
                episode,
            },
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id == 0 {
            return Err(CoreError::invalid_target(self.kind, self.id, "missing id"));
        }
        if self.kind == MediaKind::Tv {
            match (self.season, self.episode) {
                (Some(s), Some(e)) if s > 0 && e > 0 => {}
                _ => {
                    return Err(CoreError::invalid_target(
                        self.kind,
                        self.id,
                        "series need a season and an episode",
                    ))
                }
            }
        }
        Ok(())
    }

    pub fn embed_url(&self, base_url: &str) -> Result<String, CoreError> {
        self.validate()?;
        let base = base_url.trim_end_matches('/');
        Ok(match (self.kind, self.season, self.episode) {
            (MediaKind::Tv, Some(season), Some(episode)) => {
                format!("{}/tv/{}/{}/{}", base, self.id, season, episode)
            }
            _ => format!("{}/movie/{}", base, self.id),
        })
    }

    /// Following episode in the same season.
    pub fn next_episode(&self) -> Result<PlaybackTarget, CoreError> {
        match (self.kind, self.season, self.episode) {
            (MediaKind::Tv, Some(season), Some(episode)) => episode
                .checked_add(1)
                .map(|next| PlaybackTarget::episode(self.id, season, next))
                .ok_or_else(|| CoreError::invalid_target(self.kind, self.id, "no episode after the last one")),
            _ => Err(CoreError::NoSession),
        }
    }

    pub fn label(&self) -> String {
        match (self.season, self.episode) {
            (Some(s), Some(e)) => format!("{} {} T{}E{}", self.kind, self.id, s, e),
            _ => format!("{} {}", self.kind, self.id),
        }
    }
}

pub fn trailer_embed_url(key: &str) -> String {
    format!("https://www.youtube.com/embed/{}?autoplay=1&controls=1&rel=0", key)
}

/// The title currently loaded in the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSession {
    pub target: PlaybackTarget,
    #[serde(default)]
    pub entry: Option<PosterEntry>,
    #[serde(default)]
    pub seasons: Vec<SeasonSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Closed,
    Open { season: u32 },
}

#[derive(Debug, Clone)]
pub enum ModalState {
    Closed,
    Loading {
        token: RequestToken,
        kind: MediaKind,
        id: MediaId,
    },
    Details(Box<DetailsView>),
    Player {
        session: PlayerSession,
        panel: PanelState,
    },
    Trailer {
        kind: MediaKind,
        id: MediaId,
        key: String,
    },
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        !matches!(self, ModalState::Closed)
    }

    pub fn session(&self) -> Option<&PlayerSession> {
        match self {
            ModalState::Player { session, .. } => Some(session),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    OpenDetails {
        token: RequestToken,
        kind: MediaKind,
        id: MediaId,
    },
    DetailsLoaded {
        token: RequestToken,
        result: Result<Box<DetailsView>, String>,
    },
    Play {
        target: PlaybackTarget,
        entry: Option<PosterEntry>,
        seasons: Vec<SeasonSummary>,
    },
    NextEpisode,
    OpenPanel,
    SeasonsLoaded(Vec<SeasonSummary>),
    SelectSeason(u32),
    SelectEpisode {
        season: u32,
        episode: u32,
    },
    ClosePanel,
    ShowTrailer {
        kind: MediaKind,
        id: MediaId,
        key: String,
    },
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Embed {
    Player(PlaybackTarget),
    Trailer(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchDetails {
        token: RequestToken,
        kind: MediaKind,
        id: MediaId,
    },
    CancelRequest(View),
    RecordPlay {
        target: PlaybackTarget,
        entry: Option<PosterEntry>,
    },
    LoadEmbed(Embed),
    TeardownEmbed,
    PersistSession(PlayerSession),
    LoadSeasons {
        series_id: MediaId,
    },
    LoadEpisodes {
        series_id: MediaId,
        season: u32,
        active: Option<(u32, u32)>,
    },
    LockScroll,
    RestoreScroll,
    RefreshRows,
    RefreshMyList,
    /// User-visible failure message.
    Rejected(String),
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub state: ModalState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn new(state: ModalState, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }

    fn unchanged(state: ModalState) -> Self {
        Self::new(state, Vec::new())
    }

    fn rejected(state: ModalState, message: impl Into<String>) -> Self {
        Self::new(state, vec![Effect::Rejected(message.into())])
    }
}

/// Effects of leaving `state` for another open modal.
fn leave(state: &ModalState) -> Vec<Effect> {
    match state {
        ModalState::Closed => vec![Effect::LockScroll],
        // the new token supersedes the pending one
        ModalState::Loading { .. } => Vec::new(),
        ModalState::Details(_) => vec![Effect::RefreshMyList],
        ModalState::Player { .. } | ModalState::Trailer { .. } => vec![Effect::TeardownEmbed],
    }
}

fn active_episode(target: &PlaybackTarget) -> Option<(u32, u32)> {
    target.season.zip(target.episode)
}

pub fn reduce(state: ModalState, action: Action) -> Transition {
    match action {
        Action::OpenDetails { token, kind, id } => {
            let mut effects = leave(&state);
            effects.push(Effect::FetchDetails { token, kind, id });
            Transition::new(ModalState::Loading { token, kind, id }, effects)
        }

        Action::DetailsLoaded { token, result } => match &state {
            ModalState::Loading { token: current, .. } if *current == token => match result {
                Ok(view) => Transition::unchanged(ModalState::Details(view)),
                Err(message) => Transition::new(
                    ModalState::Closed,
                    vec![Effect::Rejected(message), Effect::RestoreScroll],
                ),
            },
            _ => Transition::unchanged(state),
        },

        Action::Play {
            target,
            entry,
            seasons,
        } => {
            if let Err(e) = target.validate() {
                return Transition::rejected(state, e.to_string());
            }
            if state.session().map(|s| s.target) == Some(target) {
                return Transition::unchanged(state);
            }
            let (panel, previous_seasons) = match &state {
                ModalState::Player { session, panel } => {
                    let same_series = session.target.id == target.id && session.target.kind == target.kind;
                    let panel = match panel {
                        PanelState::Open { .. } if target.kind == MediaKind::Tv => PanelState::Open {
                            season: target.season.unwrap_or(1),
                        },
                        _ => PanelState::Closed,
                    };
                    (panel, if same_series { session.seasons.clone() } else { Vec::new() })
                }
                _ => (PanelState::Closed, Vec::new()),
            };

            let session = PlayerSession {
                target,
                entry: entry.clone(),
                seasons: if seasons.is_empty() { previous_seasons } else { seasons },
            };
            let mut effects = leave(&state);
            effects.push(Effect::RecordPlay { target, entry });
            effects.push(Effect::LoadEmbed(Embed::Player(target)));
            effects.push(Effect::PersistSession(session.clone()));
            if let PanelState::Open { season } = panel {
                effects.push(Effect::LoadEpisodes {
                    series_id: target.id,
                    season,
                    active: active_episode(&target),
                });
            }
            Transition::new(ModalState::Player { session, panel }, effects)
        }

        Action::NextEpisode => {
            let next = match &state {
                ModalState::Player { session, .. } => session
                    .target
                    .next_episode()
                    .map(|target| (target, session.entry.clone(), session.seasons.clone())),
                _ => Err(CoreError::NoSession),
            };
            match next {
                Ok((target, entry, seasons)) => reduce(
                    state,
                    Action::Play {
                        target,
                        entry,
                        seasons,
                    },
                ),
                Err(e) => Transition::rejected(state, e.to_string()),
            }
        }

        Action::OpenPanel => match state {
            ModalState::Player { session, .. } if session.target.kind == MediaKind::Tv => {
                let season = initial_season(session.target.season, &session.seasons);
                let mut effects = Vec::new();
                if session.seasons.is_empty() {
                    effects.push(Effect::LoadSeasons {
                        series_id: session.target.id,
                    });
                }
                effects.push(Effect::LoadEpisodes {
                    series_id: session.target.id,
                    season,
                    active: active_episode(&session.target),
                });
                Transition::new(
                    ModalState::Player {
                        session,
                        panel: PanelState::Open { season },
                    },
                    effects,
                )
            }
            other => Transition::rejected(other, "Item não é uma série"),
        },

        Action::SeasonsLoaded(seasons) => match state {
            ModalState::Player { mut session, panel } => {
                session.seasons = seasons.into_iter().filter(|s| s.is_playable()).collect();
                let effects = vec![Effect::PersistSession(session.clone())];
                Transition::new(ModalState::Player { session, panel }, effects)
            }
            other => Transition::unchanged(other),
        },

        Action::SelectSeason(season) => match state {
            ModalState::Player {
                session,
                panel: PanelState::Open { .. },
            } => {
                let effects = vec![Effect::LoadEpisodes {
                    series_id: session.target.id,
                    season,
                    active: active_episode(&session.target),
                }];
                Transition::new(
                    ModalState::Player {
                        session,
                        panel: PanelState::Open { season },
                    },
                    effects,
                )
            }
            other => Transition::unchanged(other),
        },

        Action::SelectEpisode { season, episode } => match state {
            ModalState::Player { session, .. } if session.target.kind == MediaKind::Tv => {
                let target = PlaybackTarget::episode(session.target.id, season, episode);
                let entry = session.entry.clone();
                let seasons = session.seasons.clone();
                let closed = ModalState::Player {
                    session,
                    panel: PanelState::Closed,
                };
                reduce(
                    closed,
                    Action::Play {
                        target,
                        entry,
                        seasons,
                    },
                )
            }
            other => Transition::rejected(other, CoreError::NoSession.to_string()),
        },

        Action::ClosePanel => match state {
            ModalState::Player { session, .. } => Transition::unchanged(ModalState::Player {
                session,
                panel: PanelState::Closed,
            }),
            other => Transition::unchanged(other),
        },

        Action::ShowTrailer { kind, id, key } => {
            let mut effects = leave(&state);
            effects.push(Effect::LoadEmbed(Embed::Trailer(key.clone())));
            Transition::new(ModalState::Trailer { kind, id, key }, effects)
        }

        Action::Close => {
            let effects = match &state {
                ModalState::Closed => Vec::new(),
                ModalState::Loading { .. } => {
                    vec![Effect::CancelRequest(View::Details), Effect::RestoreScroll]
                }
                ModalState::Details(_) => vec![Effect::RestoreScroll, Effect::RefreshMyList],
                ModalState::Player { .. } | ModalState::Trailer { .. } => {
                    vec![Effect::TeardownEmbed, Effect::RestoreScroll, Effect::RefreshRows]
                }
            };
            Transition::new(ModalState::Closed, effects)
        }
    }
}

/// Views the controller should redraw after a modal closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    Rows,
    MyList,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlayOutcome {
    Started { embed_url: String },
    AlreadyPlaying { embed_url: String },
}

impl PlayOutcome {
    pub fn embed_url(&self) -> &str {
        match self {
            PlayOutcome::Started { embed_url } | PlayOutcome::AlreadyPlaying { embed_url } => embed_url,
        }
    }
}

pub fn save_session(store: &WatchStore, session: &PlayerSession) {
    match serde_json::to_string(session) {
        Ok(content) => {
            if let Err(e) = store.backend().set(keys::PLAYER_SESSION, &content) {
                warn!(error = %e, "Failed to persist player session");
            }
        }
        Err(e) => warn!(error = %e, "Failed to encode player session"),
    }
}

pub fn load_session(store: &WatchStore) -> Option<PlayerSession> {
    let raw = match store.backend().get(keys::PLAYER_SESSION) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!(error = %e, "Failed to read player session");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(session) => Some(session),
        Err(e) => {
            warn!(error = %e, "Ignoring unreadable player session");
            None
        }
    }
}

/// Owns the modal state and carries out reducer effects.
pub struct ModalManager {
    source: Arc<dyn MetadataSource>,
    store: WatchStore,
    config: PlayerConfig,
    region: String,
    state: ModalState,
    scope: RequestScope,
    seasons: SeasonCache,
    panel_episodes: Vec<EpisodeRow>,
    embed: Option<String>,
    scroll_locked: bool,
    refreshes: Vec<Refresh>,
    notices: Vec<String>,
}

impl ModalManager {
    pub fn new(
        source: Arc<dyn MetadataSource>,
        store: WatchStore,
        config: PlayerConfig,
        region: impl Into<String>,
    ) -> Self {
        Self {
            source,
            store,
            config,
            region: region.into(),
            state: ModalState::Closed,
            scope: RequestScope::new(),
            seasons: SeasonCache::new(),
            panel_episodes: Vec::new(),
            embed: None,
            scroll_locked: false,
            refreshes: Vec::new(),
            notices: Vec::new(),
        }
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn embed_url(&self) -> Option<&str> {
        self.embed.as_deref()
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    /// Season shown by the open episode panel.
    pub fn panel_season(&self) -> Option<u32> {
        match &self.state {
            ModalState::Player {
                panel: PanelState::Open { season },
                ..
            } => Some(*season),
            _ => None,
        }
    }

    pub fn panel_episodes(&self) -> &[EpisodeRow] {
        &self.panel_episodes
    }

    pub fn request_scope(&self) -> &RequestScope {
        &self.scope
    }

    pub fn take_refreshes(&mut self) -> Vec<Refresh> {
        std::mem::take(&mut self.refreshes)
    }

    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    /// Run `action` and every follow-up action its effects produce.
    pub async fn dispatch(&mut self, action: Action) {
        let mut queue = VecDeque::from([action]);
        while let Some(action) = queue.pop_front() {
            let state = std::mem::replace(&mut self.state, ModalState::Closed);
            let Transition { state, effects } = reduce(state, action);
            self.state = state;
            for effect in effects {
                if let Some(follow_up) = self.apply(effect).await {
                    queue.push_back(follow_up);
                }
            }
        }
    }

    async fn apply(&mut self, effect: Effect) -> Option<Action> {
        debug!(?effect, "Applying modal effect");
        match effect {
            Effect::FetchDetails { token, kind, id } => {
                let result = load_details(
                    self.source.as_ref(),
                    &self.store,
                    &mut self.seasons,
                    kind,
                    id,
                    &self.region,
                )
                .await
                .map(Box::new)
                .map_err(|_| "Não foi possível carregar os detalhes.".to_string());
                self.scope
                    .accept(&token, result)
                    .map(|result| Action::DetailsLoaded { token, result })
            }
            Effect::CancelRequest(view) => {
                self.scope.cancel(view);
                None
            }
            Effect::RecordPlay { target, entry } => {
                self.record_play(&target, entry.as_ref());
                None
            }
            Effect::LoadEmbed(Embed::Player(target)) => {
                match target.embed_url(&self.config.embed_base_url) {
                    Ok(url) => self.embed = Some(url),
                    Err(e) => self.notices.push(e.to_string()),
                }
                None
            }
            Effect::LoadEmbed(Embed::Trailer(key)) => {
                self.embed = Some(trailer_embed_url(&key));
                None
            }
            Effect::TeardownEmbed => {
                self.embed = None;
                self.panel_episodes.clear();
                None
            }
            Effect::PersistSession(session) => {
                save_session(&self.store, &session);
                None
            }
            Effect::LoadSeasons { series_id } => {
                match api::details(self.source.as_ref(), MediaKind::Tv, series_id).await {
                    Ok(details) => Some(Action::SeasonsLoaded(details.seasons)),
                    Err(e) => {
                        warn!(series_id, error = %e, "Failed to load seasons");
                        self.notices.push("Não foi possível buscar dados da temporada.".to_string());
                        None
                    }
                }
            }
            Effect::LoadEpisodes {
                series_id,
                season,
                active,
            } => {
                self.panel_episodes = match self.seasons.episodes(self.source.as_ref(), series_id, season).await {
                    Some(episodes) => episode_rows(&self.store, series_id, season, &episodes, active),
                    None => Vec::new(),
                };
                None
            }
            Effect::LockScroll => {
                self.scroll_locked = true;
                None
            }
            Effect::RestoreScroll => {
                self.scroll_locked = false;
                None
            }
            Effect::RefreshRows => {
                self.refreshes.push(Refresh::Rows);
                None
            }
            Effect::RefreshMyList => {
                self.refreshes.push(Refresh::MyList);
                None
            }
            Effect::Rejected(message) => {
                warn!(%message, "Modal action rejected");
                self.notices.push(message);
                None
            }
        }
    }

    fn record_play(&self, target: &PlaybackTarget, entry: Option<&PosterEntry>) {
        match entry {
            Some(entry) => {
                let draft = EntryDraft::from(entry);
                self.store.save_to_watched_history(&draft);
                self.store.save_to_continue_watching(&draft);
                if self.config.remove_from_my_list_on_play && self.store.is_in_my_list(target.id, target.kind) {
                    self.store.remove_from_my_list(target.id, target.kind);
                }
            }
            None => warn!(target = %target.label(), "No title data, history not updated"),
        }
        self.store
            .save_watched_episode(target.id, target.kind, target.season, target.episode);
        info!(operation = "play", target = %target.label(), "Playback started");
    }

    /// Open the details modal. A failure closes it again.
    pub async fn open_details(&mut self, kind: MediaKind, id: MediaId) -> Result<DetailsView, CoreError> {
        let token = self.scope.begin(View::Details);
        self.dispatch(Action::OpenDetails { token, kind, id }).await;
        match &self.state {
            ModalState::Details(view) => Ok(view.as_ref().clone()),
            _ => Err(CoreError::DetailsUnavailable { kind, id }),
        }
    }

    /// Details modal "my list" button; returns the new membership.
    pub fn toggle_my_list(&mut self) -> Option<bool> {
        match &mut self.state {
            ModalState::Details(view) => {
                let now_in_list = self.store.toggle_my_list(&view.draft);
                view.in_my_list = now_in_list;
                Some(now_in_list)
            }
            _ => None,
        }
    }

    /// Start playback. Playing what is already loaded changes nothing.
    pub async fn play(&mut self, target: PlaybackTarget, entry: Option<EntryDraft>) -> Result<PlayOutcome, CoreError> {
        target.validate()?;
        let entry = entry.and_then(|draft| match draft.validate() {
            Ok(entry) => Some(entry),
            Err(missing) => {
                warn!(target = %target.label(), %missing, "Incomplete title data");
                None
            }
        });
        self.play_with(target, entry, Vec::new()).await
    }

    async fn play_with(
        &mut self,
        target: PlaybackTarget,
        entry: Option<PosterEntry>,
        seasons: Vec<SeasonSummary>,
    ) -> Result<PlayOutcome, CoreError> {
        let already = self.state.session().map(|s| s.target) == Some(target);
        self.dispatch(Action::Play { target, entry, seasons }).await;
        self.outcome(already)
    }

    fn outcome(&self, already: bool) -> Result<PlayOutcome, CoreError> {
        let embed_url = self.embed.clone().ok_or(CoreError::NoSession)?;
        Ok(if already {
            PlayOutcome::AlreadyPlaying { embed_url }
        } else {
            PlayOutcome::Started { embed_url }
        })
    }

    /// Details modal "play": movies play directly, series play the chosen
    /// (or first) episode.
    pub async fn play_from_details(
        &mut self,
        season: Option<u32>,
        episode: Option<u32>,
    ) -> Result<PlayOutcome, CoreError> {
        let ModalState::Details(view) = &self.state else {
            return Err(CoreError::NoSession);
        };
        let target = match view.kind {
            MediaKind::Movie => PlaybackTarget::movie(view.id),
            MediaKind::Tv => PlaybackTarget::episode(
                view.id,
                season.or(view.default_season()).unwrap_or(1),
                episode.unwrap_or(1),
            ),
        };
        target.validate()?;
        let entry = view.draft.validate().ok();
        let seasons = view.seasons.clone();
        self.play_with(target, entry, seasons).await
    }

    /// Put a persisted session back in the player without replaying it.
    pub fn resume(&mut self, session: PlayerSession) {
        if let Ok(url) = session.target.embed_url(&self.config.embed_base_url) {
            self.embed = Some(url);
        }
        self.state = ModalState::Player {
            session,
            panel: PanelState::Closed,
        };
    }

    pub fn resume_last(&mut self) -> bool {
        match load_session(&self.store) {
            Some(session) => {
                self.resume(session);
                true
            }
            None => false,
        }
    }

    pub async fn next_episode(&mut self) -> Result<PlayOutcome, CoreError> {
        let session = self.state.session().ok_or(CoreError::NoSession)?;
        session.target.next_episode()?;
        self.dispatch(Action::NextEpisode).await;
        self.outcome(false)
    }

    pub async fn open_episode_panel(&mut self) -> Result<&[EpisodeRow], CoreError> {
        match self.state.session() {
            Some(session) if session.target.kind == MediaKind::Tv => {}
            _ => return Err(CoreError::NoSession),
        }
        self.dispatch(Action::OpenPanel).await;
        Ok(&self.panel_episodes)
    }

    pub async fn select_season(&mut self, season: u32) -> &[EpisodeRow] {
        self.dispatch(Action::SelectSeason(season)).await;
        &self.panel_episodes
    }

    pub async fn select_episode(&mut self, season: u32, episode: u32) -> Result<PlayOutcome, CoreError> {
        let session = self.state.session().ok_or(CoreError::NoSession)?;
        let target = PlaybackTarget::episode(session.target.id, season, episode);
        target.validate()?;
        let already = session.target == target;
        self.dispatch(Action::SelectEpisode { season, episode }).await;
        self.outcome(already)
    }

    pub fn close_episode_panel(&mut self) {
        let state = std::mem::replace(&mut self.state, ModalState::Closed);
        self.state = reduce(state, Action::ClosePanel).state;
    }

    /// Show the title's trailer. History is not touched.
    pub async fn play_trailer(&mut self, kind: MediaKind, id: MediaId) -> Result<String, CoreError> {
        let video = load_trailer(self.source.as_ref(), kind, id).await?;
        self.dispatch(Action::ShowTrailer {
            kind,
            id,
            key: video.key.clone(),
        })
        .await;
        Ok(video.youtube_url())
    }

    pub async fn close(&mut self) {
        self.dispatch(Action::Close).await;
    }
}
