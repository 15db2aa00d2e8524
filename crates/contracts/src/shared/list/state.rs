//! Page-level list state as a single update function.
//!
//! A list page owns one `ListState`; every user action and every completed
//! remote call is turned into a `ListAction` and fed through `dispatch`. The
//! returned `Effect` tells the page which remote call to start next.

use std::collections::BTreeSet;

use super::field::ListRecord;
use super::filter::{FilterSpec, Predicate};
use super::sort::SortSpec;
use super::view::ListView;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading {
        ticket: u64,
    },
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Create,
    Edit(String),
    View(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Idle,
    Pending,
    Failed(String),
}

#[derive(Debug, Clone)]
pub enum ListAction<R> {
    BeginLoad,
    Loaded { ticket: u64, records: Vec<R> },
    LoadFailed { ticket: u64, message: String },
    SetFilter(FilterSpec),
    SetPredicate(Predicate),
    ClearFilters,
    ToggleSort(String),
    SetSort(Option<SortSpec>),
    ToggleSelect(String),
    SelectAllVisible,
    ClearSelection,
    OpenModal(ModalState),
    CloseModal,
    BeginSubmit,
    SubmitFailed(String),
    /// A remote write finished: clears selection, closes the modal and reloads
    MutationCompleted,
}

/// What the page has to do after a dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Start a fetch; deliver the result with this ticket
    Load { ticket: u64 },
    /// Proceed with the submission that was just marked pending
    Submit,
    /// The action was dropped (double submit, stale response)
    Ignored,
}

#[derive(Debug, Clone)]
pub struct ListState<R> {
    records: Vec<R>,
    generation: u64,
    next_ticket: u64,
    pub load: LoadState,
    pub filter: FilterSpec,
    pub sort: Option<SortSpec>,
    pub selected: BTreeSet<String>,
    pub modal: ModalState,
    pub submit: SubmitState,
    view: ListView,
}

impl<R: ListRecord> ListState<R> {
    pub fn new(sort: Option<SortSpec>) -> Self {
        Self {
            records: Vec::new(),
            generation: 0,
            next_ticket: 0,
            load: LoadState::Idle,
            filter: FilterSpec::default(),
            sort,
            selected: BTreeSet::new(),
            modal: ModalState::Closed,
            submit: SubmitState::Idle,
            view: ListView::new(),
        }
    }

    /// Full collection as last loaded
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Filtered and sorted subset, memoized between dispatches
    pub fn visible(&mut self) -> Vec<&R> {
        self.view.derive(
            &self.records,
            self.generation,
            &self.filter,
            self.sort.as_ref(),
        )
    }

    /// Records whose ids are selected, in collection order
    pub fn selected_records(&self) -> Vec<&R> {
        self.records
            .iter()
            .filter(|r| self.selected.contains(&r.record_id()))
            .collect()
    }

    pub fn is_submitting(&self) -> bool {
        self.submit == SubmitState::Pending
    }

    pub fn dispatch(&mut self, action: ListAction<R>) -> Effect {
        match action {
            ListAction::BeginLoad => self.begin_load(),
            ListAction::Loaded { ticket, records } => {
                if !self.is_current(ticket) {
                    return Effect::Ignored;
                }
                self.records = records;
                self.generation += 1;
                self.load = LoadState::Ready;
                let known: BTreeSet<String> =
                    self.records.iter().map(|r| r.record_id()).collect();
                self.selected.retain(|id| known.contains(id));
                Effect::None
            }
            ListAction::LoadFailed { ticket, message } => {
                if !self.is_current(ticket) {
                    return Effect::Ignored;
                }
                self.load = LoadState::Failed(message);
                Effect::None
            }
            ListAction::SetFilter(filter) => {
                self.filter = filter;
                Effect::None
            }
            ListAction::SetPredicate(predicate) => {
                self.filter.set(predicate);
                Effect::None
            }
            ListAction::ClearFilters => {
                self.filter.clear();
                Effect::None
            }
            ListAction::ToggleSort(key) => {
                self.sort = Some(SortSpec::toggled(self.sort.as_ref(), &key));
                Effect::None
            }
            ListAction::SetSort(sort) => {
                self.sort = sort;
                Effect::None
            }
            ListAction::ToggleSelect(id) => {
                if !self.selected.remove(&id) {
                    self.selected.insert(id);
                }
                Effect::None
            }
            ListAction::SelectAllVisible => {
                let visible: BTreeSet<String> =
                    self.visible().iter().map(|r| r.record_id()).collect();
                if !visible.is_empty() && self.selected == visible {
                    self.selected.clear();
                } else {
                    self.selected = visible;
                }
                Effect::None
            }
            ListAction::ClearSelection => {
                self.selected.clear();
                Effect::None
            }
            ListAction::OpenModal(modal) => {
                self.modal = modal;
                self.submit = SubmitState::Idle;
                Effect::None
            }
            ListAction::CloseModal => {
                if self.is_submitting() {
                    return Effect::Ignored;
                }
                self.modal = ModalState::Closed;
                self.submit = SubmitState::Idle;
                Effect::None
            }
            ListAction::BeginSubmit => {
                if self.is_submitting() {
                    return Effect::Ignored;
                }
                self.submit = SubmitState::Pending;
                Effect::Submit
            }
            ListAction::SubmitFailed(message) => {
                // modal stays open so the form keeps its draft
                self.submit = SubmitState::Failed(message);
                Effect::None
            }
            ListAction::MutationCompleted => {
                self.submit = SubmitState::Idle;
                self.modal = ModalState::Closed;
                self.selected.clear();
                self.begin_load()
            }
        }
    }

    fn begin_load(&mut self) -> Effect {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.load = LoadState::Loading { ticket };
        Effect::Load { ticket }
    }

    fn is_current(&self, ticket: u64) -> bool {
        matches!(self.load, LoadState::Loading { ticket: current } if current == ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list::field::FieldValue;

    #[derive(Debug, Clone, PartialEq)]
    struct Rec {
        id: String,
        status: &'static str,
    }

    impl ListRecord for Rec {
        fn record_id(&self) -> String {
            self.id.clone()
        }

        fn field(&self, key: &str) -> FieldValue<'_> {
            match key {
                "id" => FieldValue::text(&self.id),
                "status" => FieldValue::text(self.status),
                _ => FieldValue::Missing,
            }
        }

        fn search_fields() -> &'static [&'static str] {
            &["id"]
        }
    }

    fn rec(id: &str, status: &'static str) -> Rec {
        Rec {
            id: id.to_string(),
            status,
        }
    }

    fn loaded_state(records: Vec<Rec>) -> ListState<Rec> {
        let mut state = ListState::new(None);
        let ticket = match state.dispatch(ListAction::BeginLoad) {
            Effect::Load { ticket } => ticket,
            other => panic!("unexpected effect {other:?}"),
        };
        assert_eq!(
            state.dispatch(ListAction::Loaded { ticket, records }),
            Effect::None
        );
        state
    }

    #[test]
    fn test_stale_load_is_ignored() {
        let mut state: ListState<Rec> = ListState::new(None);
        let first = match state.dispatch(ListAction::BeginLoad) {
            Effect::Load { ticket } => ticket,
            _ => unreachable!(),
        };
        let second = match state.dispatch(ListAction::BeginLoad) {
            Effect::Load { ticket } => ticket,
            _ => unreachable!(),
        };
        assert_eq!(
            state.dispatch(ListAction::Loaded {
                ticket: first,
                records: vec![rec("old", "pending")],
            }),
            Effect::Ignored
        );
        assert!(state.records().is_empty());
        state.dispatch(ListAction::Loaded {
            ticket: second,
            records: vec![rec("new", "pending")],
        });
        assert_eq!(state.records().len(), 1);
        assert_eq!(state.load, LoadState::Ready);
    }

    #[test]
    fn test_filter_and_select_all_visible() {
        let mut state = loaded_state(vec![
            rec("A", "pending"),
            rec("B", "shipped"),
            rec("C", "pending"),
        ]);
        state.dispatch(ListAction::SetPredicate(Predicate::Equals {
            field: "status".into(),
            value: "pending".into(),
        }));
        assert_eq!(state.visible().len(), 2);

        state.dispatch(ListAction::SelectAllVisible);
        assert_eq!(
            state.selected.iter().cloned().collect::<Vec<_>>(),
            vec!["A".to_string(), "C".to_string()]
        );

        state.dispatch(ListAction::SelectAllVisible);
        assert!(state.selected.is_empty());
    }

    #[test]
    fn test_double_submit_is_ignored() {
        let mut state = loaded_state(vec![rec("A", "pending")]);
        state.dispatch(ListAction::OpenModal(ModalState::Create));
        assert_eq!(state.dispatch(ListAction::BeginSubmit), Effect::Submit);
        assert_eq!(state.dispatch(ListAction::BeginSubmit), Effect::Ignored);
        assert_eq!(state.dispatch(ListAction::CloseModal), Effect::Ignored);
    }

    #[test]
    fn test_failed_submit_keeps_modal_open() {
        let mut state = loaded_state(vec![rec("A", "pending")]);
        state.dispatch(ListAction::OpenModal(ModalState::Edit("A".into())));
        state.dispatch(ListAction::BeginSubmit);
        state.dispatch(ListAction::SubmitFailed("quantity must be >= 0".into()));
        assert_eq!(state.modal, ModalState::Edit("A".into()));
        assert_eq!(
            state.submit,
            SubmitState::Failed("quantity must be >= 0".into())
        );
        assert_eq!(state.dispatch(ListAction::BeginSubmit), Effect::Submit);
    }

    #[test]
    fn test_mutation_completed_clears_selection_and_reloads() {
        let mut state = loaded_state(vec![rec("A", "pending"), rec("B", "pending")]);
        state.dispatch(ListAction::ToggleSelect("A".into()));
        state.dispatch(ListAction::BeginSubmit);
        let effect = state.dispatch(ListAction::MutationCompleted);
        assert!(matches!(effect, Effect::Load { .. }));
        assert!(state.selected.is_empty());
        assert_eq!(state.modal, ModalState::Closed);
        assert_eq!(state.submit, SubmitState::Idle);
    }

    #[test]
    fn test_reload_drops_vanished_selection() {
        let mut state = loaded_state(vec![rec("A", "pending"), rec("B", "pending")]);
        state.dispatch(ListAction::ToggleSelect("A".into()));
        state.dispatch(ListAction::ToggleSelect("B".into()));
        let ticket = match state.dispatch(ListAction::BeginLoad) {
            Effect::Load { ticket } => ticket,
            _ => unreachable!(),
        };
        state.dispatch(ListAction::Loaded {
            ticket,
            records: vec![rec("B", "pending")],
        });
        assert_eq!(state.selected_records(), vec![&rec("B", "pending")]);
    }
}
