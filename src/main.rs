use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend, text::Line, widgets::ListState};
use ratatui_image::{picker::Picker, protocol::StatefulProtocol};
use std::{
    collections::VecDeque,
    env, io,
    sync::{Arc, mpsc},
    thread,
    time::{Duration, Instant},
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

mod classify;
mod events;
mod github;
mod highlight;
mod notebook;
mod profile;
mod render;
mod ui;

use classify::ContentKind;
use github::{Client, GitHubError, Repo, RepoEntry};

mod theme {
    use ratatui::style::Color;

    #[derive(Clone, Copy, Debug)]
    pub struct Palette {
        pub fg: Color,
        pub dim: Color,
        pub accent_primary: Color,
        pub accent_secondary: Color,
        pub border: Color,
        pub selection_bg: Color,
        pub dir_color: Color,
        pub err_fg: Color,
        pub ok_fg: Color,
        pub code_bg: Color,
    }

    /// Slate-and-cyan identity of the portfolio.
    pub fn palette() -> Palette {
        Palette {
            fg: Color::Rgb(226, 232, 240),
            dim: Color::Rgb(100, 116, 139),
            accent_primary: Color::Rgb(34, 211, 238),
            accent_secondary: Color::Rgb(125, 211, 252),
            border: Color::Rgb(51, 65, 85),
            selection_bg: Color::Rgb(30, 41, 59),
            dir_color: Color::Rgb(34, 211, 238),
            err_fg: Color::Rgb(248, 113, 113),
            ok_fg: Color::Rgb(74, 222, 128),
            code_bg: Color::Rgb(40, 44, 52),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Tab {
    Home,
    Projects,
    About,
}

/// Sub-screen of the projects section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ProjectView {
    List,
    Detail,
    Notebook,
    Markdown,
}

/// One fetch recorded in the activity log.
pub(crate) struct ActivityEntry {
    pub(crate) when: Instant,
    pub(crate) what: String,
    pub(crate) ok: bool,
    pub(crate) detail: Option<String>,
}

/// Parsed payload of an opened file.
enum DocumentPayload {
    Notebook(notebook::Notebook),
    Markdown(String),
}

enum JobResult {
    Repos {
        request_id: u64,
        result: Result<Vec<Repo>, GitHubError>,
    },
    Listing {
        request_id: u64,
        path: String,
        result: Result<Vec<RepoEntry>, GitHubError>,
    },
    Document {
        request_id: u64,
        name: String,
        result: Result<DocumentPayload, GitHubError>,
    },
    Readme {
        request_id: u64,
        result: Result<String, GitHubError>,
    },
    Cover {
        request_id: u64,
        result: Result<image::DynamicImage, GitHubError>,
    },
    DocImage {
        request_id: u64,
        result: Result<image::DynamicImage, GitHubError>,
    },
}

struct PendingJob {
    rx: mpsc::Receiver<JobResult>,
}

pub(crate) struct App {
    pub(crate) profile: profile::Profile,
    client: Arc<Client>,

    pub(crate) section: Tab,
    pub(crate) view: ProjectView,

    pub(crate) repos: Vec<Repo>,
    pub(crate) repo_state: ListState,
    pub(crate) search_query: String,
    pub(crate) search_edit: bool,
    pub(crate) filtered: Vec<usize>,

    pub(crate) selected_repo: Option<Repo>,
    pub(crate) current_path: String,
    pub(crate) entries: Vec<RepoEntry>,
    pub(crate) entry_state: ListState,

    pub(crate) readme: Option<String>,
    pub(crate) readme_lines: Vec<Line<'static>>,
    pub(crate) readme_scroll: u16,
    pub(crate) cover_url: Option<String>,
    pub(crate) cover_image: Option<StatefulProtocol>,

    pub(crate) notebook: Option<notebook::Notebook>,
    pub(crate) document: Option<String>,
    pub(crate) document_title: String,
    pub(crate) document_lines: Vec<Line<'static>>,
    pub(crate) document_scroll: u16,
    pub(crate) document_image: Option<StatefulProtocol>,
    pub(crate) image_error: Option<String>,

    pub(crate) loading: bool,
    pub(crate) error: Option<String>,

    nav_request_id: u64,
    nav_job: Option<PendingJob>,
    readme_job: Option<PendingJob>,
    cover_job: Option<PendingJob>,
    doc_image_job: Option<PendingJob>,

    pub(crate) picker: Picker,
    pub(crate) palette: theme::Palette,
    pub(crate) status_message: Option<(String, Instant)>,
    pub(crate) status_ttl: Duration,
    pub(crate) activity: VecDeque<ActivityEntry>,
    pub(crate) should_quit: bool,
}

impl App {
    fn new(profile: profile::Profile, picker: Picker) -> Self {
        let client = Arc::new(Client::new(profile.token.clone()));
        Self {
            profile,
            client,
            section: Tab::Home,
            view: ProjectView::List,
            repos: Vec::new(),
            repo_state: ListState::default(),
            search_query: String::new(),
            search_edit: false,
            filtered: Vec::new(),
            selected_repo: None,
            current_path: String::new(),
            entries: Vec::new(),
            entry_state: ListState::default(),
            readme: None,
            readme_lines: Vec::new(),
            readme_scroll: 0,
            cover_url: None,
            cover_image: None,
            notebook: None,
            document: None,
            document_title: String::new(),
            document_lines: Vec::new(),
            document_scroll: 0,
            document_image: None,
            image_error: None,
            loading: false,
            error: None,
            nav_request_id: 0,
            nav_job: None,
            readme_job: None,
            cover_job: None,
            doc_image_job: None,
            picker,
            palette: theme::palette(),
            status_message: None,
            status_ttl: Duration::from_secs(3),
            activity: VecDeque::new(),
            should_quit: false,
        }
    }

    fn bump_nav(&mut self) -> u64 {
        self.nav_request_id = self.nav_request_id.wrapping_add(1);
        self.nav_request_id
    }

    // --- Transitions ---------------------------------------------------

    /// (Re)load the repository list for the configured user.
    pub(crate) fn load_repos(&mut self) {
        self.loading = true;
        self.error = None;
        let request_id = self.bump_nav();
        let user = self.profile.github_user.clone();
        let client = Arc::clone(&self.client);
        let (tx, rx) = mpsc::channel();
        self.nav_job = Some(PendingJob { rx });
        thread::spawn(move || {
            let result = client.list_repos(&user);
            let _ = tx.send(JobResult::Repos { request_id, result });
        });
    }

    pub(crate) fn open_repository(&mut self, repo: Repo) {
        self.selected_repo = Some(repo);
        self.current_path = String::new();
        self.view = ProjectView::Detail;
        self.notebook = None;
        self.document = None;
        self.document_lines.clear();
        self.start_listing(String::new());
    }

    pub(crate) fn open_directory(&mut self, path: String) {
        if self.selected_repo.is_none() {
            return;
        }
        self.view = ProjectView::Detail;
        self.notebook = None;
        self.document = None;
        self.document_lines.clear();
        self.start_listing(path);
    }

    pub(crate) fn open_file(&mut self, entry: RepoEntry) {
        let kind = classify::classify(&entry);
        if kind == ContentKind::Directory {
            self.open_directory(entry.path);
            return;
        }
        // Entries without raw content (submodules, some symlinks) are ignored.
        let Some(url) = entry.download_url else {
            return;
        };
        if kind == ContentKind::Image {
            self.notebook = None;
            self.document_lines = render::markdown_lines(
                &classify::image_wrapper(&entry.name, &url),
                &self.palette,
            );
            self.document = Some(classify::image_wrapper(&entry.name, &url));
            self.document_title = entry.name;
            self.document_scroll = 0;
            self.document_image = None;
            self.image_error = None;
            self.view = ProjectView::Markdown;
            self.start_doc_image(url);
            return;
        }
        self.start_document_job(kind, entry.name, url);
    }

    pub(crate) fn go_back(&mut self) {
        match self.view {
            ProjectView::Notebook | ProjectView::Markdown => {
                self.view = ProjectView::Detail;
                self.notebook = None;
                self.document = None;
                self.document_lines.clear();
                self.document_scroll = 0;
                self.document_image = None;
                self.image_error = None;
            }
            ProjectView::Detail => {
                if self.current_path.is_empty() {
                    self.view = ProjectView::List;
                    self.selected_repo = None;
                    self.entries.clear();
                    self.entry_state.select(None);
                } else {
                    let parent = parent_path(&self.current_path).to_string();
                    self.start_listing(parent);
                }
            }
            ProjectView::List => {}
        }
    }

    // --- Background jobs -----------------------------------------------

    fn start_listing(&mut self, path: String) {
        let Some(repo) = self.selected_repo.clone() else {
            return;
        };
        self.loading = true;
        self.error = None;
        self.readme = None;
        self.readme_lines.clear();
        self.readme_scroll = 0;
        self.cover_url = None;
        self.cover_image = None;
        let request_id = self.bump_nav();
        let client = Arc::clone(&self.client);
        let (tx, rx) = mpsc::channel();
        self.nav_job = Some(PendingJob { rx });
        thread::spawn(move || {
            let result = client.list_dir(&repo.owner.login, &repo.name, &path);
            let _ = tx.send(JobResult::Listing {
                request_id,
                path,
                result,
            });
        });
    }

    fn start_document_job(&mut self, kind: ContentKind, name: String, url: String) {
        self.loading = true;
        self.error = None;
        let request_id = self.bump_nav();
        let client = Arc::clone(&self.client);
        let (tx, rx) = mpsc::channel();
        self.nav_job = Some(PendingJob { rx });
        thread::spawn(move || {
            let result = client.fetch_raw(&url).and_then(|raw| match &kind {
                ContentKind::Notebook => notebook::parse(&raw).map(DocumentPayload::Notebook),
                ContentKind::Code { lang } => {
                    Ok(DocumentPayload::Markdown(classify::fence(lang, &raw)))
                }
                _ => Ok(DocumentPayload::Markdown(raw)),
            });
            let _ = tx.send(JobResult::Document {
                request_id,
                name,
                result,
            });
        });
    }

    /// Readme and cover detection over the freshly applied entries. Both are
    /// opportunistic: their failures never reach the shared error slot.
    fn scan_listing_extras(&mut self) {
        let request_id = self.nav_request_id;

        if let Some(readme) = self
            .entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case("readme.md"))
            && let Some(url) = readme.download_url.clone()
        {
            let client = Arc::clone(&self.client);
            let (tx, rx) = mpsc::channel();
            self.readme_job = Some(PendingJob { rx });
            thread::spawn(move || {
                let result = client.fetch_raw(&url);
                let _ = tx.send(JobResult::Readme { request_id, result });
            });
        }

        const COVER_NAMES: [&str; 4] = ["preview.png", "preview.jpg", "cover.png", "cover.jpg"];
        if let Some(cover) = self
            .entries
            .iter()
            .find(|e| COVER_NAMES.contains(&e.name.to_lowercase().as_str()))
            && let Some(url) = cover.download_url.clone()
        {
            self.cover_url = Some(url.clone());
            let client = Arc::clone(&self.client);
            let (tx, rx) = mpsc::channel();
            self.cover_job = Some(PendingJob { rx });
            thread::spawn(move || {
                let result = client.fetch_bytes(&url).and_then(|bytes| {
                    image::load_from_memory(&bytes)
                        .map_err(|e| GitHubError::DownloadFailed(e.to_string()))
                });
                let _ = tx.send(JobResult::Cover { request_id, result });
            });
        }
    }

    fn start_doc_image(&mut self, url: String) {
        let request_id = self.nav_request_id;
        let client = Arc::clone(&self.client);
        let (tx, rx) = mpsc::channel();
        self.doc_image_job = Some(PendingJob { rx });
        thread::spawn(move || {
            let result = client.fetch_bytes(&url).and_then(|bytes| {
                image::load_from_memory(&bytes)
                    .map_err(|e| GitHubError::DownloadFailed(e.to_string()))
            });
            let _ = tx.send(JobResult::DocImage { request_id, result });
        });
    }

    pub(crate) fn poll_jobs(&mut self) {
        self.poll_nav_job();
        self.poll_readme_job();
        self.poll_cover_job();
        self.poll_doc_image_job();
    }

    fn poll_nav_job(&mut self) {
        let mut done = None;
        if let Some(job) = &self.nav_job {
            match job.rx.try_recv() {
                Ok(msg) => done = Some(Some(msg)),
                Err(mpsc::TryRecvError::Empty) => {}
                Err(mpsc::TryRecvError::Disconnected) => done = Some(None),
            }
        }
        match done {
            Some(Some(msg)) => {
                self.nav_job = None;
                self.handle_job_result(msg);
            }
            Some(None) => {
                self.nav_job = None;
                self.loading = false;
                self.error = Some("Background fetch stopped unexpectedly".to_string());
            }
            None => {}
        }
    }

    fn poll_readme_job(&mut self) {
        if let Some(msg) = drain_side_job(&mut self.readme_job) {
            self.handle_job_result(msg);
        }
    }

    fn poll_cover_job(&mut self) {
        if let Some(msg) = drain_side_job(&mut self.cover_job) {
            self.handle_job_result(msg);
        }
    }

    fn poll_doc_image_job(&mut self) {
        if let Some(msg) = drain_side_job(&mut self.doc_image_job) {
            self.handle_job_result(msg);
        }
    }

    fn handle_job_result(&mut self, msg: JobResult) {
        match msg {
            JobResult::Repos { request_id, result } => {
                if request_id != self.nav_request_id {
                    return;
                }
                self.loading = false;
                match result {
                    Ok(repos) => {
                        self.repos = repos;
                        self.update_filtered();
                        self.log_activity("fetch repositories", Ok(()));
                    }
                    Err(e) => {
                        self.error = Some(e.to_string());
                        self.log_activity("fetch repositories", Err(e.to_string()));
                    }
                }
            }
            JobResult::Listing {
                request_id,
                path,
                result,
            } => {
                if request_id != self.nav_request_id {
                    return;
                }
                self.loading = false;
                match result {
                    Ok(entries) => {
                        self.entries = entries;
                        self.current_path = path.clone();
                        self.entry_state
                            .select(if self.entries.is_empty() { None } else { Some(0) });
                        self.log_activity(format!("list /{}", path), Ok(()));
                        self.scan_listing_extras();
                    }
                    Err(e) => {
                        self.error = Some(e.to_string());
                        self.log_activity(format!("list /{}", path), Err(e.to_string()));
                    }
                }
            }
            JobResult::Document {
                request_id,
                name,
                result,
            } => {
                if request_id != self.nav_request_id {
                    return;
                }
                self.loading = false;
                match result {
                    Ok(DocumentPayload::Notebook(nb)) => {
                        self.document = None;
                        self.document_lines = render::notebook_lines(&nb, &self.palette);
                        self.notebook = Some(nb);
                        self.document_title = name;
                        self.document_scroll = 0;
                        self.document_image = None;
                        self.image_error = None;
                        self.view = ProjectView::Notebook;
                    }
                    Ok(DocumentPayload::Markdown(text)) => {
                        self.notebook = None;
                        self.document_lines = render::markdown_lines(&text, &self.palette);
                        self.document = Some(text);
                        self.document_title = name;
                        self.document_scroll = 0;
                        self.document_image = None;
                        self.image_error = None;
                        self.view = ProjectView::Markdown;
                    }
                    Err(e) => {
                        self.error = Some(e.to_string());
                        self.log_activity(format!("open {}", name), Err(e.to_string()));
                    }
                }
            }
            JobResult::Readme { request_id, result } => {
                if request_id != self.nav_request_id {
                    return;
                }
                match result {
                    Ok(text) => {
                        self.readme_lines = render::markdown_lines(&text, &self.palette);
                        self.readme = Some(text);
                    }
                    Err(e) => self.log_activity("fetch readme", Err(e.to_string())),
                }
            }
            JobResult::Cover { request_id, result } => {
                if request_id != self.nav_request_id {
                    return;
                }
                match result {
                    Ok(img) => self.cover_image = Some(self.picker.new_resize_protocol(img)),
                    Err(e) => self.log_activity("fetch cover image", Err(e.to_string())),
                }
            }
            JobResult::DocImage { request_id, result } => {
                if request_id != self.nav_request_id {
                    return;
                }
                match result {
                    Ok(img) => {
                        self.image_error = None;
                        self.document_image = Some(self.picker.new_resize_protocol(img));
                    }
                    Err(e) => self.image_error = Some(e.to_string()),
                }
            }
        }
    }

    // --- Selection & helpers --------------------------------------------

    pub(crate) fn update_filtered(&mut self) {
        let query = self.search_query.to_lowercase();
        self.filtered = self
            .repos
            .iter()
            .enumerate()
            .filter(|(_, repo)| {
                query.is_empty()
                    || repo.name.to_lowercase().contains(&query)
                    || repo
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&query))
            })
            .map(|(idx, _)| idx)
            .collect();
        if self.filtered.is_empty() {
            self.repo_state.select(None);
        } else {
            let selected = self
                .repo_state
                .selected()
                .unwrap_or(0)
                .min(self.filtered.len() - 1);
            self.repo_state.select(Some(selected));
        }
    }

    pub(crate) fn move_repo_selection(&mut self, delta: i32) {
        move_selection(&mut self.repo_state, self.filtered.len(), delta);
    }

    pub(crate) fn move_entry_selection(&mut self, delta: i32) {
        move_selection(&mut self.entry_state, self.entries.len(), delta);
    }

    pub(crate) fn selected_repo_row(&self) -> Option<&Repo> {
        let idx = self.repo_state.selected()?;
        let repo_idx = *self.filtered.get(idx)?;
        self.repos.get(repo_idx)
    }

    pub(crate) fn selected_entry(&self) -> Option<&RepoEntry> {
        self.entry_state.selected().and_then(|i| self.entries.get(i))
    }

    pub(crate) fn open_selected_repo(&mut self) {
        if let Some(repo) = self.selected_repo_row().cloned() {
            self.open_repository(repo);
        }
    }

    pub(crate) fn open_selected_entry(&mut self) {
        if let Some(entry) = self.selected_entry().cloned() {
            self.open_file(entry);
        }
    }

    pub(crate) fn scroll_document(&mut self, delta: i32) {
        let max = self.document_lines.len().saturating_sub(1) as u16;
        self.document_scroll = add_clamped(self.document_scroll, delta, max);
    }

    pub(crate) fn scroll_readme(&mut self, delta: i32) {
        let max = self.readme_lines.len().saturating_sub(1) as u16;
        self.readme_scroll = add_clamped(self.readme_scroll, delta, max);
    }

    pub(crate) fn yank(&mut self, label: &str, text: String) {
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            Ok(()) => self.set_status(format!("Copied {}", label)),
            Err(e) => self.set_status(format!("Clipboard error: {}", e)),
        }
    }

    pub(crate) fn set_status<S: Into<String>>(&mut self, msg: S) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    pub(crate) fn maybe_expire_status(&mut self) {
        let expired = self
            .status_message
            .as_ref()
            .is_some_and(|(_, t)| t.elapsed() >= self.status_ttl);
        if expired {
            self.status_message = None;
        }
    }

    fn log_activity<S: Into<String>>(&mut self, what: S, result: Result<(), String>) {
        let ok = result.is_ok();
        self.activity.push_front(ActivityEntry {
            when: Instant::now(),
            what: what.into(),
            ok,
            detail: result.err(),
        });
        while self.activity.len() > 100 {
            self.activity.pop_back();
        }
    }

    fn is_ssh_session() -> bool {
        env::var_os("SSH_CONNECTION").is_some() || env::var_os("SSH_TTY").is_some()
    }
}

/// Take a finished result from an opportunistic job slot. A disconnected
/// worker just clears the slot; opportunistic fetches have no error surface.
fn drain_side_job(slot: &mut Option<PendingJob>) -> Option<JobResult> {
    let job = slot.as_ref()?;
    match job.rx.try_recv() {
        Ok(msg) => {
            *slot = None;
            Some(msg)
        }
        Err(mpsc::TryRecvError::Empty) => None,
        Err(mpsc::TryRecvError::Disconnected) => {
            *slot = None;
            None
        }
    }
}

fn move_selection(state: &mut ListState, len: usize, delta: i32) {
    if len == 0 {
        state.select(None);
        return;
    }
    let cur = state.selected().unwrap_or(0) as i32;
    let next = (cur + delta).clamp(0, len.saturating_sub(1) as i32);
    state.select(Some(next as usize));
}

fn add_clamped(value: u16, delta: i32, max: u16) -> u16 {
    let next = (value as i32 + delta).clamp(0, max as i32);
    next as u16
}

/// Parent of a slash-separated path; the parent of a one-segment path is the
/// empty string (repository root).
pub(crate) fn parent_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

pub(crate) fn format_size(size: u64) -> String {
    if size == 0 {
        "-".to_string()
    } else if size < 1024 {
        format!("{} B", size)
    } else if size < 1024 * 1024 {
        format!("{:.1} KB", size as f64 / 1024.0)
    } else {
        format!("{:.1} MB", size as f64 / (1024.0 * 1024.0))
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let _ = dotenvy::dotenv();

    if let Some(arg) = env::args().nth(1) {
        if arg == "--version" || arg == "-V" {
            println!("gitfolio {}", VERSION);
            return Ok(());
        }
    }

    let profile = profile::Profile::from_env();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let picker = if App::is_ssh_session() {
        Picker::halfblocks()
    } else {
        Picker::from_query_stdio().unwrap_or_else(|_| Picker::halfblocks())
    };

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(profile, picker);
    app.load_repos();

    let mut event_stream = EventStream::new();

    loop {
        app.poll_jobs();
        app.maybe_expire_status();

        terminal.draw(|f| ui::draw(f, &mut app))?;

        if let Some(state) = &mut app.cover_image
            && let Some(Err(e)) = state.last_encoding_result()
        {
            let detail = e.to_string();
            app.cover_image = None;
            app.log_activity("render cover image", Err(detail));
        }
        if let Some(state) = &mut app.document_image
            && let Some(Err(e)) = state.last_encoding_result()
        {
            app.image_error = Some(format!("Image Error: {}", e));
            app.document_image = None;
        }

        let poll_timeout = tokio::time::sleep(Duration::from_millis(100));
        tokio::pin!(poll_timeout);

        tokio::select! {
            Some(event_result) = event_stream.next() => {
                if let Ok(Event::Key(key)) = event_result
                    && key.kind == KeyEventKind::Press
                    && matches!(events::handle_key_event(&mut app, key), events::KeyEventResult::Quit)
                {
                    app.should_quit = true;
                }
            }
            _ = &mut poll_timeout => {}
        }

        if app.should_quit {
            break;
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use github::{EntryKind, RepoOwner};

    fn test_app() -> App {
        let profile = profile::Profile {
            name: "Test".to_string(),
            github_user: "tester".to_string(),
            bio: String::new(),
            linkedin_url: None,
            token: None,
        };
        App::new(profile, Picker::halfblocks())
    }

    fn repo(name: &str) -> Repo {
        Repo {
            id: 1,
            name: name.to_string(),
            description: Some("demo repository".to_string()),
            html_url: format!("https://github.com/tester/{}", name),
            stargazers_count: 3,
            forks_count: 1,
            language: Some("Rust".to_string()),
            updated_at: "2026-01-02T03:04:05Z".to_string(),
            default_branch: "main".to_string(),
            owner: RepoOwner {
                login: "tester".to_string(),
            },
        }
    }

    fn file(name: &str, path: &str) -> RepoEntry {
        RepoEntry {
            name: name.to_string(),
            path: path.to_string(),
            kind: EntryKind::File,
            size: 10,
            download_url: Some(format!("https://raw.invalid/{}", path)),
        }
    }

    fn dir(name: &str, path: &str) -> RepoEntry {
        RepoEntry {
            name: name.to_string(),
            path: path.to_string(),
            kind: EntryKind::Dir,
            size: 0,
            download_url: None,
        }
    }

    fn listing_ok(app: &App, path: &str, entries: Vec<RepoEntry>) -> JobResult {
        JobResult::Listing {
            request_id: app.nav_request_id,
            path: path.to_string(),
            result: Ok(entries),
        }
    }

    fn assert_invariant(app: &App) {
        match app.view {
            ProjectView::List => {
                assert!(app.selected_repo.is_none());
                assert!(app.current_path.is_empty());
            }
            ProjectView::Detail => {
                assert!(app.selected_repo.is_some());
                assert!(app.notebook.is_none());
                assert!(app.document.is_none());
            }
            ProjectView::Notebook => {
                assert!(app.selected_repo.is_some());
                assert!(app.notebook.is_some());
                assert!(app.document.is_none());
            }
            ProjectView::Markdown => {
                assert!(app.selected_repo.is_some());
                assert!(app.document.is_some());
                assert!(app.notebook.is_none());
            }
        }
    }

    #[test]
    fn parent_path_drops_the_last_segment() {
        assert_eq!(parent_path("a/b/c"), "a/b");
        assert_eq!(parent_path("a"), "");
        assert_eq!(parent_path(""), "");
    }

    #[test]
    fn open_repository_enters_detail_and_loads_root() {
        let mut app = test_app();
        app.open_repository(repo("demo"));
        assert_eq!(app.view, ProjectView::Detail);
        assert!(app.loading);
        assert!(app.error.is_none());
        assert_invariant(&app);

        let msg = listing_ok(&app, "", vec![dir("src", "src"), file("Cargo.toml", "Cargo.toml")]);
        app.handle_job_result(msg);
        assert!(!app.loading);
        assert_eq!(app.entries.len(), 2);
        assert_eq!(app.current_path, "");
        assert_eq!(app.entry_state.selected(), Some(0));
        assert_invariant(&app);
    }

    #[test]
    fn repos_failure_sets_the_shared_error() {
        let mut app = test_app();
        app.load_repos();
        let msg = JobResult::Repos {
            request_id: app.nav_request_id,
            result: Err(GitHubError::UserNotFound("tester".to_string())),
        };
        app.handle_job_result(msg);
        assert!(!app.loading);
        assert!(app.error.as_deref().unwrap().contains("not found"));
    }

    #[test]
    fn listing_failure_keeps_entries_but_clears_readme_eagerly() {
        let mut app = test_app();
        app.open_repository(repo("demo"));
        let msg = listing_ok(&app, "", vec![dir("src", "src")]);
        app.handle_job_result(msg);

        // Simulate an attached readme from the successful load.
        let readme = JobResult::Readme {
            request_id: app.nav_request_id,
            result: Ok("# demo".to_string()),
        };
        app.handle_job_result(readme);
        assert!(app.readme.is_some());

        app.open_directory("src".to_string());
        // Cleared at the start of the load, before any result arrives.
        assert!(app.readme.is_none());
        assert!(app.cover_url.is_none());

        let msg = JobResult::Listing {
            request_id: app.nav_request_id,
            path: "src".to_string(),
            result: Err(GitHubError::FetchFailed("HTTP 500".to_string())),
        };
        app.handle_job_result(msg);
        assert!(app.error.is_some());
        assert_eq!(app.view, ProjectView::Detail);
        // Entries from the previous successful load survive a failed one.
        assert_eq!(app.entries.len(), 1);
        assert_eq!(app.current_path, "");
    }

    #[test]
    fn go_back_walks_up_the_directory_tree() {
        let mut app = test_app();
        app.open_repository(repo("demo"));
        app.handle_job_result(listing_ok(&app, "a/b/c", vec![file("x.rs", "a/b/c/x.rs")]));
        assert_eq!(app.current_path, "a/b/c");

        app.go_back();
        assert!(app.loading);
        app.handle_job_result(listing_ok(&app, "a/b", vec![dir("c", "a/b/c")]));
        assert_eq!(app.current_path, "a/b");
        assert_eq!(app.view, ProjectView::Detail);

        app.go_back();
        app.handle_job_result(listing_ok(&app, "a", vec![dir("b", "a/b")]));
        assert_eq!(app.current_path, "a");

        app.go_back();
        app.handle_job_result(listing_ok(&app, "", vec![dir("a", "a")]));
        assert_eq!(app.current_path, "");
        assert_eq!(app.view, ProjectView::Detail);

        app.go_back();
        assert_eq!(app.view, ProjectView::List);
        assert!(app.selected_repo.is_none());
        assert!(app.entries.is_empty());
        assert_invariant(&app);

        // No screen above the list.
        app.go_back();
        assert_eq!(app.view, ProjectView::List);
    }

    #[test]
    fn go_back_from_a_document_restores_detail() {
        let mut app = test_app();
        app.open_repository(repo("demo"));
        app.handle_job_result(listing_ok(&app, "", vec![file("notes.md", "notes.md")]));

        app.open_file(file("notes.md", "notes.md"));
        assert!(app.loading);
        assert_eq!(app.view, ProjectView::Detail);
        let msg = JobResult::Document {
            request_id: app.nav_request_id,
            name: "notes.md".to_string(),
            result: Ok(DocumentPayload::Markdown("# notes".to_string())),
        };
        app.handle_job_result(msg);
        assert_eq!(app.view, ProjectView::Markdown);
        assert!(app.document.is_some());
        assert_invariant(&app);

        app.go_back();
        assert_eq!(app.view, ProjectView::Detail);
        assert!(app.document.is_none());
        assert!(app.document_lines.is_empty());
        assert_invariant(&app);
    }

    #[test]
    fn open_file_on_a_directory_delegates_to_open_directory() {
        let mut app = test_app();
        app.open_repository(repo("demo"));
        app.handle_job_result(listing_ok(&app, "", vec![dir("src", "src")]));

        app.open_file(dir("src", "src"));
        assert!(app.loading);
        assert_eq!(app.view, ProjectView::Detail);
        app.handle_job_result(listing_ok(&app, "src", vec![file("main.rs", "src/main.rs")]));
        assert_eq!(app.current_path, "src");
        assert_eq!(app.entries[0].name, "main.rs");
    }

    #[test]
    fn open_file_without_download_url_is_a_no_op() {
        let mut app = test_app();
        app.open_repository(repo("demo"));
        app.handle_job_result(listing_ok(&app, "", vec![]));

        let mut entry = file("vendored", "vendored");
        entry.download_url = None;
        app.open_file(entry);
        assert!(!app.loading);
        assert_eq!(app.view, ProjectView::Detail);
        assert!(app.error.is_none());
    }

    #[test]
    fn open_file_on_an_image_short_circuits_to_markdown() {
        let mut app = test_app();
        app.open_repository(repo("demo"));
        app.handle_job_result(listing_ok(&app, "", vec![]));

        app.open_file(file("shot.PNG", "shot.PNG"));
        assert_eq!(app.view, ProjectView::Markdown);
        assert!(!app.loading);
        assert_eq!(
            app.document.as_deref(),
            Some("![shot.PNG](https://raw.invalid/shot.PNG)")
        );
        assert_invariant(&app);
    }

    #[test]
    fn notebook_parse_failure_surfaces_error_and_stays_on_detail() {
        let mut app = test_app();
        app.open_repository(repo("demo"));
        app.handle_job_result(listing_ok(&app, "", vec![]));

        app.open_file(file("analysis.ipynb", "analysis.ipynb"));
        let msg = JobResult::Document {
            request_id: app.nav_request_id,
            name: "analysis.ipynb".to_string(),
            result: Err(GitHubError::ParseFailed("expected value".to_string())),
        };
        app.handle_job_result(msg);
        assert_eq!(app.view, ProjectView::Detail);
        assert!(app.error.as_deref().unwrap().contains("notebook"));
        assert!(app.notebook.is_none());
        assert_invariant(&app);
    }

    #[test]
    fn stale_results_are_discarded() {
        let mut app = test_app();
        app.open_repository(repo("demo"));
        let stale_id = app.nav_request_id;
        app.open_directory("newer".to_string());

        app.handle_job_result(JobResult::Listing {
            request_id: stale_id,
            path: "".to_string(),
            result: Ok(vec![dir("old", "old")]),
        });
        // Ignored entirely: the newer load is still in flight.
        assert!(app.entries.is_empty());
        assert!(app.loading);

        app.handle_job_result(listing_ok(&app, "newer", vec![dir("new", "newer/new")]));
        assert_eq!(app.current_path, "newer");
        assert_eq!(app.entries[0].name, "new");
    }

    #[test]
    fn stale_readme_never_attaches_to_a_newer_view() {
        let mut app = test_app();
        app.open_repository(repo("demo"));
        app.handle_job_result(listing_ok(&app, "", vec![]));
        let stale_id = app.nav_request_id;

        app.open_directory("docs".to_string());
        app.handle_job_result(JobResult::Readme {
            request_id: stale_id,
            result: Ok("# stale".to_string()),
        });
        assert!(app.readme.is_none());
    }

    #[test]
    fn readme_failure_is_logged_not_surfaced() {
        let mut app = test_app();
        app.open_repository(repo("demo"));
        app.handle_job_result(listing_ok(&app, "", vec![]));

        app.handle_job_result(JobResult::Readme {
            request_id: app.nav_request_id,
            result: Err(GitHubError::DownloadFailed("HTTP 404".to_string())),
        });
        assert!(app.error.is_none());
        assert!(app.readme.is_none());
        let entry = app.activity.front().unwrap();
        assert!(!entry.ok);
        assert_eq!(entry.what, "fetch readme");
    }

    #[test]
    fn cover_is_detected_case_insensitively_without_a_fetch() {
        let mut app = test_app();
        app.open_repository(repo("demo"));
        app.handle_job_result(listing_ok(
            &app,
            "",
            vec![file("Cover.PNG", "Cover.PNG"), file("main.rs", "main.rs")],
        ));
        assert_eq!(
            app.cover_url.as_deref(),
            Some("https://raw.invalid/Cover.PNG")
        );
    }

    #[test]
    fn search_filters_by_name_and_description() {
        let mut app = test_app();
        let mut other = repo("unrelated");
        other.description = Some("terminal ui experiment".to_string());
        app.repos = vec![repo("portfolio"), other];
        app.update_filtered();
        assert_eq!(app.filtered.len(), 2);

        app.search_query = "FOLIO".to_string();
        app.update_filtered();
        assert_eq!(app.filtered, vec![0]);

        app.search_query = "terminal".to_string();
        app.update_filtered();
        assert_eq!(app.filtered, vec![1]);

        app.search_query = "nothing".to_string();
        app.update_filtered();
        assert!(app.filtered.is_empty());
        assert_eq!(app.repo_state.selected(), None);
    }

    #[test]
    fn format_size_matches_the_file_table() {
        assert_eq!(format_size(0), "-");
        assert_eq!(format_size(100), "100 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
