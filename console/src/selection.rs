//! Active site / active building selection.
//!
//! The coordinator keeps the building selection valid while the candidate
//! list underneath it changes (site switch, building deletion, reload) and
//! tells a deliberate "all buildings" choice apart from a `None` that only
//! exists because nothing has been picked yet.

/// How the current building selection came about.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BuildingSelectionMode {
    /// Picked (or cleared) by reconciliation, not by the user.
    #[default]
    Auto,
    /// The user asked for every building of the site.
    UserChoseNull,
    /// The user picked a specific building.
    UserChoseValue,
}

/// What a reconciliation pass did to the building selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reconciliation<B> {
    Unchanged,
    /// First building of a newly selected (or first loaded) site.
    Selected(B),
    /// The selected building vanished from the candidates.
    Healed { stale: B, replacement: Option<B> },
    /// No site is selected any more.
    Cleared,
    /// The site changed but has no buildings yet; selection waits for data.
    Deferred,
}

impl<B> Reconciliation<B> {
    pub fn changed_building(&self) -> bool {
        matches!(
            self,
            Reconciliation::Selected(_) | Reconciliation::Healed { .. } | Reconciliation::Cleared
        )
    }
}

/// Selection state machine, generic over the site and building id types.
#[derive(Clone, Debug)]
pub struct SelectionCoordinator<S, B> {
    active_site: Option<S>,
    active_building: Option<B>,
    mode: BuildingSelectionMode,
    previous_site: Option<S>,
}

impl<S, B> Default for SelectionCoordinator<S, B> {
    fn default() -> Self {
        Self {
            active_site: None,
            active_building: None,
            mode: BuildingSelectionMode::Auto,
            previous_site: None,
        }
    }
}

impl<S, B> SelectionCoordinator<S, B>
where
    S: Clone + PartialEq,
    B: Clone + PartialEq,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_site(&self) -> Option<&S> {
        self.active_site.as_ref()
    }

    pub fn active_building(&self) -> Option<&B> {
        self.active_building.as_ref()
    }

    pub fn mode(&self) -> BuildingSelectionMode {
        self.mode
    }

    /// True between `set_active_site` and the reconciliation pass that
    /// processes it.
    pub fn site_change_pending(&self) -> bool {
        self.active_site != self.previous_site
    }

    /// Replace the active site. The building is left alone until the next
    /// reconciliation pass. A "no building" choice belongs to the site it was
    /// made under, so switching sites drops it.
    pub fn set_active_site(&mut self, site: Option<S>) {
        if self.active_site == site {
            return;
        }
        if self.mode == BuildingSelectionMode::UserChoseNull {
            self.mode = BuildingSelectionMode::Auto;
        }
        self.active_site = site;
    }

    pub fn set_active_building(&mut self, building: Option<B>) {
        self.mode = match (&building, self.site_change_pending()) {
            (Some(_), _) => BuildingSelectionMode::UserChoseValue,
            (None, true) => BuildingSelectionMode::Auto,
            (None, false) => BuildingSelectionMode::UserChoseNull,
        };
        self.active_building = building;
    }

    /// Repair the selection against the current candidate buildings of the
    /// active site. Unknown sites simply have no candidates.
    pub fn reconcile(&mut self, candidates: &[B]) -> Reconciliation<B> {
        let Some(site) = self.active_site.clone() else {
            self.mode = BuildingSelectionMode::Auto;
            self.previous_site = None;
            return match self.active_building.take() {
                Some(_) => Reconciliation::Cleared,
                None => Reconciliation::Unchanged,
            };
        };

        if self.previous_site.as_ref() != Some(&site) {
            return self.reconcile_site_change(site, candidates);
        }

        match self.active_building.clone() {
            Some(current) if !candidates.contains(&current) => {
                let replacement = candidates.first().cloned();
                self.active_building = replacement.clone();
                self.mode = BuildingSelectionMode::Auto;
                Reconciliation::Healed {
                    stale: current,
                    replacement,
                }
            }
            // Emptied by an earlier pass, not by the user: refill once
            // buildings exist again.
            None if self.mode == BuildingSelectionMode::Auto => match candidates.first() {
                Some(first) => {
                    self.active_building = Some(first.clone());
                    Reconciliation::Selected(first.clone())
                }
                None => Reconciliation::Unchanged,
            },
            _ => Reconciliation::Unchanged,
        }
    }

    fn reconcile_site_change(&mut self, site: S, candidates: &[B]) -> Reconciliation<B> {
        let Some(first) = candidates.first() else {
            // Keep the change pending so the first building is picked once
            // the site's buildings arrive.
            self.mode = BuildingSelectionMode::Auto;
            return match self.active_building.take() {
                Some(stale) => Reconciliation::Healed {
                    stale,
                    replacement: None,
                },
                None => Reconciliation::Deferred,
            };
        };

        let keep_user_pick = self.mode == BuildingSelectionMode::UserChoseValue
            && self
                .active_building
                .as_ref()
                .is_some_and(|current| candidates.contains(current));

        self.previous_site = Some(site);
        if self.mode == BuildingSelectionMode::UserChoseNull {
            self.active_building = None;
            return Reconciliation::Unchanged;
        }

        self.mode = BuildingSelectionMode::Auto;
        if keep_user_pick {
            return Reconciliation::Unchanged;
        }
        self.active_building = Some(first.clone());
        Reconciliation::Selected(first.clone())
    }
}
