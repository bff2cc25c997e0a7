//! The view coordinator: owns mode, anchor, results and route as one
//! consistent snapshot and reacts to the four user triggers.
//!
//! Each trigger comes in two shapes. The `begin_*`/`complete_*` pairs hand
//! out tickets so a host can run the collaborator call however it likes and
//! report back later; completions for superseded tickets are discarded. The
//! convenience methods (`submit_named_search`, `request_device_location`,
//! `change_category`, `select_result`) drive the collaborators to completion
//! in one call.

use tracing::{debug, info, instrument, warn};

use crate::config::explorer_config::ExplorerConfig;
use crate::core::generation::{Generation, GenerationCounter, SearchKey};
use crate::core::state::{Activity, AnchorMarker, Mode, Notice, Selection, Snapshot, Viewport};
use crate::data::poi::Coordinate;
use crate::error::ExplorerError;
use crate::geo::bounds::MapBounds;
use crate::services::anchor_resolver::{self, Anchor};
use crate::services::proximity_search::{self, validate_category, PoiQuery, SearchResultSet};
use crate::services::route_overlay::{self, route_permitted, RoutePath, RouteState};
use crate::services::traits::{Geocoder, GeolocationProvider, PoiSource, RoutingService};

/// The collaborators a synchronous call needs.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub geocoder: &'a dyn Geocoder,
    pub pois: &'a dyn PoiSource,
    pub geolocation: &'a dyn GeolocationProvider,
    pub router: &'a dyn RoutingService,
}

impl<'a> Services<'a> {
    /// Uses one value for every collaborator, e.g. a recorded fixture world.
    pub fn from_world<W>(world: &'a W) -> Self
    where
        W: Geocoder + PoiSource + GeolocationProvider + RoutingService,
    {
        Self { geocoder: world, pois: world, geolocation: world, router: world }
    }
}

/// Result of feeding a response back to the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Applied(T),
    /// The response belonged to a superseded request and was dropped.
    Discarded,
}

impl<T> Outcome<T> {
    pub fn is_discarded(&self) -> bool {
        matches!(self, Outcome::Discarded)
    }
}

#[derive(Debug, Clone)]
pub struct PlaceTicket {
    generation: Generation,
    text: String,
}

impl PlaceTicket {
    /// The text exactly as the user typed it.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }
}

#[derive(Debug, Clone)]
pub struct LocateTicket {
    generation: Generation,
}

impl LocateTicket {
    pub fn generation(&self) -> Generation {
        self.generation
    }
}

#[derive(Debug, Clone)]
pub struct SearchTicket {
    generation: Generation,
    key: SearchKey,
    query: PoiQuery,
}

impl SearchTicket {
    pub fn query(&self) -> &PoiQuery {
        &self.query
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }
}

#[derive(Debug, Clone)]
pub struct RouteTicket {
    generation: Generation,
    mode: Mode,
    from: Coordinate,
    to: Coordinate,
}

impl RouteTicket {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn from(&self) -> Coordinate {
        self.from
    }

    pub fn to(&self) -> Coordinate {
        self.to
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }
}

pub struct ViewCoordinator {
    config: ExplorerConfig,
    mode: Mode,
    activity: Activity,
    anchor: Option<Anchor>,
    category: String,
    results: Option<SearchResultSet>,
    selected: Option<Selection>,
    route: Option<RouteState>,
    viewport: Viewport,
    notice: Option<Notice>,
    anchor_requests: GenerationCounter,
    search_requests: GenerationCounter,
    route_requests: GenerationCounter,
}

impl Default for ViewCoordinator {
    fn default() -> Self {
        Self::new(ExplorerConfig::default())
    }
}

impl ViewCoordinator {
    pub fn new(config: ExplorerConfig) -> Self {
        let viewport = Viewport::Centered {
            center: config.initial_view.center,
            zoom: config.initial_view.zoom,
        };
        let category = config.default_category.trim().to_string();
        Self {
            config,
            mode: Mode::Idle,
            activity: Activity::Idle,
            anchor: None,
            category,
            results: None,
            selected: None,
            route: None,
            viewport,
            notice: None,
            anchor_requests: GenerationCounter::new(),
            search_requests: GenerationCounter::new(),
            route_requests: GenerationCounter::new(),
        }
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn anchor(&self) -> Option<&Anchor> {
        self.anchor.as_ref()
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn results(&self) -> Option<&SearchResultSet> {
        self.results.as_ref()
    }

    pub fn selected(&self) -> Option<&Selection> {
        self.selected.as_ref()
    }

    pub fn route(&self) -> Option<&RouteState> {
        self.route.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.mode,
            activity: self.activity,
            category: self.category.clone(),
            anchor_marker: self.anchor.as_ref().map(AnchorMarker::from),
            results: self.results.as_ref().map(|r| r.records.clone()).unwrap_or_default(),
            selected: self.selected.clone(),
            route: self.route.as_ref().map(|r| r.path.points.clone()),
            viewport: self.viewport,
            notice: self.notice.clone(),
        }
    }

    // Anchor from a place name

    pub fn begin_named_search(&mut self, text: &str) -> Result<PlaceTicket, ExplorerError> {
        if let Err(err) = anchor_resolver::validate_query(text) {
            return Err(self.report(err));
        }

        self.notice = None;
        self.activity = Activity::ResolvingPlace;
        Ok(PlaceTicket { generation: self.anchor_requests.advance(), text: text.to_string() })
    }

    pub fn complete_named_search(
        &mut self,
        ticket: PlaceTicket,
        resolved: Result<Anchor, ExplorerError>,
    ) -> Result<Outcome<SearchTicket>, ExplorerError> {
        if !self.anchor_requests.is_current(ticket.generation) {
            debug!(generation = ticket.generation.value(), "dropping stale place lookup");
            return Ok(Outcome::Discarded);
        }
        self.complete_anchor(resolved)
    }

    // Anchor from the device position

    pub fn begin_device_location(&mut self) -> LocateTicket {
        self.notice = None;
        self.activity = Activity::Locating;
        LocateTicket { generation: self.anchor_requests.advance() }
    }

    pub fn complete_device_location(
        &mut self,
        ticket: LocateTicket,
        resolved: Result<Anchor, ExplorerError>,
    ) -> Result<Outcome<SearchTicket>, ExplorerError> {
        if !self.anchor_requests.is_current(ticket.generation) {
            debug!(generation = ticket.generation.value(), "dropping stale position fix");
            return Ok(Outcome::Discarded);
        }
        self.complete_anchor(resolved)
    }

    fn complete_anchor(&mut self, resolved: Result<Anchor, ExplorerError>) -> Result<Outcome<SearchTicket>, ExplorerError> {
        match resolved {
            Ok(anchor) => {
                self.accept_anchor(anchor);
                self.issue_search().map(Outcome::Applied)
            }
            Err(err) => {
                // Mode, anchor and marker stay as they were
                self.activity = Activity::Idle;
                Err(self.report(err))
            }
        }
    }

    fn accept_anchor(&mut self, anchor: Anchor) {
        let next = self.mode.after_anchor(anchor.provenance);
        if next != self.mode {
            info!(from = ?self.mode, to = ?next, "mode transition");
        }

        self.retire_route("anchor replaced");
        self.route_requests.advance();
        self.selected = None;
        self.results = None;

        self.viewport = Viewport::Centered { center: anchor.coordinate, zoom: self.config.anchor_zoom };
        info!(label = %anchor.label, lat = anchor.coordinate.latitude, lon = anchor.coordinate.longitude, "anchor set");
        self.anchor = Some(anchor);
        self.mode = next;
    }

    // Category

    /// Records the category. With an anchor in place this also drops the
    /// route and selection and returns the search to run; in `Idle` nothing
    /// else changes.
    pub fn begin_category_change(&mut self, category: &str) -> Result<Option<SearchTicket>, ExplorerError> {
        let category = match validate_category(category) {
            Ok(category) => category.to_string(),
            Err(err) => return Err(self.report(err)),
        };
        self.category = category;

        if self.anchor.is_none() {
            debug!(category = %self.category, "no anchor yet, category change only recorded");
            return Ok(None);
        }

        self.notice = None;
        self.retire_route("category changed");
        self.route_requests.advance();
        self.selected = None;
        self.results = None;
        self.issue_search().map(Some)
    }

    // Proximity search

    fn issue_search(&mut self) -> Result<SearchTicket, ExplorerError> {
        let Some(center) = self.anchor.as_ref().map(|anchor| anchor.coordinate) else {
            self.activity = Activity::Idle;
            return Err(self.report(ExplorerError::SearchUnavailable { reason: "no anchor".to_string() }));
        };
        let query = match PoiQuery::new(center, &self.category, self.config.search_radius_meters) {
            Ok(query) => query,
            Err(err) => {
                self.activity = Activity::Idle;
                return Err(self.report(err));
            }
        };

        self.activity = Activity::Searching;
        Ok(SearchTicket {
            generation: self.search_requests.advance(),
            key: SearchKey::new(center, &query.category),
            query,
        })
    }

    fn search_is_current(&self, ticket: &SearchTicket) -> bool {
        self.search_requests.is_current(ticket.generation)
            && self
                .anchor
                .as_ref()
                .is_some_and(|anchor| ticket.key.matches(anchor.coordinate, &self.category))
    }

    pub fn complete_search(
        &mut self,
        ticket: SearchTicket,
        outcome: Result<SearchResultSet, ExplorerError>,
    ) -> Result<Outcome<()>, ExplorerError> {
        if !self.search_is_current(&ticket) {
            debug!(generation = ticket.generation.value(), category = %ticket.key.category, "dropping stale search response");
            return Ok(Outcome::Discarded);
        }
        self.activity = Activity::Idle;

        match outcome {
            Ok(results) => {
                info!(count = results.len(), category = %results.category, "search results ready");
                self.viewport = self.fit_results(&results);
                self.results = Some(results);
                self.notice = None;
                Ok(Outcome::Applied(()))
            }
            Err(ExplorerError::NoResultsForCategory { category }) => {
                self.results = Some(SearchResultSet::empty(ticket.key.anchor, &category));
                self.viewport = Viewport::Centered { center: ticket.key.anchor, zoom: self.config.anchor_zoom };
                Err(self.report(ExplorerError::NoResultsForCategory { category }))
            }
            Err(err) => Err(self.report(err)),
        }
    }

    /// Fits every POI marker plus the anchor; an empty set stays on the anchor.
    fn fit_results(&self, results: &SearchResultSet) -> Viewport {
        if results.is_empty() {
            return Viewport::Centered { center: results.anchor, zoom: self.config.anchor_zoom };
        }
        let mut bounds = MapBounds::from_point(results.anchor);
        for record in results.iter() {
            bounds.extend(record.coordinate);
        }
        self.fit(bounds, self.config.anchor_zoom)
    }

    /// A zero-area box cannot be fitted; centre on it instead.
    fn fit(&self, bounds: MapBounds, fallback_zoom: u8) -> Viewport {
        if bounds.is_degenerate() {
            return Viewport::Centered { center: bounds.center(), zoom: fallback_zoom };
        }
        Viewport::Fitted { bounds, padding_px: self.config.fit_padding_px }
    }

    // Selection and route

    /// Centres on the chosen POI and opens its popup. Returns the route to
    /// compute when the anchor is the device position.
    pub fn begin_selection(&mut self, index: usize) -> Result<Option<RouteTicket>, ExplorerError> {
        let record = match self.results.as_ref().and_then(|r| r.get(index)) {
            Some(record) => record.clone(),
            None => {
                let len = self.results.as_ref().map_or(0, SearchResultSet::len);
                return Err(self.report(ExplorerError::UnknownResult { index, len }));
            }
        };

        self.retire_route("new selection");
        let generation = self.route_requests.advance();
        self.notice = None;
        self.viewport = Viewport::Centered { center: record.coordinate, zoom: self.config.result_zoom };
        debug!(index, name = %record.name, "result selected");
        let destination = record.coordinate;
        self.selected = Some(Selection { index, record });

        match &self.anchor {
            Some(anchor) if route_permitted(self.mode) => {
                self.activity = Activity::Routing;
                Ok(Some(RouteTicket { generation, mode: self.mode, from: anchor.coordinate, to: destination }))
            }
            _ => Ok(None),
        }
    }

    pub fn complete_route(
        &mut self,
        ticket: RouteTicket,
        outcome: Result<Option<RoutePath>, ExplorerError>,
    ) -> Result<Outcome<()>, ExplorerError> {
        if !self.route_requests.is_current(ticket.generation) {
            debug!(generation = ticket.generation.value(), "dropping stale route");
            return Ok(Outcome::Discarded);
        }
        self.activity = Activity::Idle;

        let path = match outcome {
            Ok(Some(path)) => path,
            Ok(None) => return Ok(Outcome::Applied(())),
            // The destination marker stays; only the path is missing
            Err(err) => return Err(self.report(err)),
        };
        let source_anchor = match &self.anchor {
            Some(anchor) if route_permitted(self.mode) => anchor.clone(),
            _ => {
                warn!(mode = ?self.mode, "route arrived outside device-location mode");
                return Ok(Outcome::Discarded);
            }
        };

        self.retire_route("replaced by new route");
        if let Some(bounds) = path.bounds() {
            self.viewport = self.fit(bounds, self.config.result_zoom);
        }
        info!(points = path.len(), length_km = path.length_km(), "route drawn");
        self.route = Some(RouteState { path, source_anchor, destination: ticket.to });
        Ok(Outcome::Applied(()))
    }

    fn retire_route(&mut self, reason: &str) {
        if let Some(old) = self.route.take() {
            debug!(reason, points = old.path.len(), "route retired");
        }
    }

    fn report(&mut self, err: ExplorerError) -> ExplorerError {
        warn!(kind = ?err.kind(), error = %err, "operation failed");
        self.notice = Some(Notice::from(&err));
        err
    }

    // Synchronous drivers

    #[instrument(skip(self, services))]
    pub fn submit_named_search(&mut self, services: &Services<'_>, text: &str) -> Result<Snapshot, ExplorerError> {
        let ticket = self.begin_named_search(text)?;
        let resolved = anchor_resolver::resolve_by_name(services.geocoder, ticket.text());
        match self.complete_named_search(ticket, resolved)? {
            Outcome::Applied(search) => self.run_search(services, search),
            Outcome::Discarded => Ok(self.snapshot()),
        }
    }

    #[instrument(skip(self, services))]
    pub fn request_device_location(&mut self, services: &Services<'_>) -> Result<Snapshot, ExplorerError> {
        let ticket = self.begin_device_location();
        let resolved = anchor_resolver::resolve_by_device_location(services.geolocation);
        match self.complete_device_location(ticket, resolved)? {
            Outcome::Applied(search) => self.run_search(services, search),
            Outcome::Discarded => Ok(self.snapshot()),
        }
    }

    #[instrument(skip(self, services))]
    pub fn change_category(&mut self, services: &Services<'_>, category: &str) -> Result<Snapshot, ExplorerError> {
        match self.begin_category_change(category)? {
            Some(search) => self.run_search(services, search),
            None => Ok(self.snapshot()),
        }
    }

    #[instrument(skip(self, services))]
    pub fn select_result(&mut self, services: &Services<'_>, index: usize) -> Result<Snapshot, ExplorerError> {
        if let Some(ticket) = self.begin_selection(index)? {
            let outcome = route_overlay::compute_route(services.router, ticket.mode(), ticket.from(), ticket.to());
            self.complete_route(ticket, outcome)?;
        }
        Ok(self.snapshot())
    }

    fn run_search(&mut self, services: &Services<'_>, search: SearchTicket) -> Result<Snapshot, ExplorerError> {
        let outcome = proximity_search::query(services.pois, search.query());
        self.complete_search(search, outcome)?;
        Ok(self.snapshot())
    }
}
