// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Library public API integration tests.

use library_lending_rs::{
    ChannelNotifier, CollaboratorError, FeePolicy, Library, LibraryConfig, LibraryError,
    LibraryEvent, NotificationTriggers, Notifier, RejectReason, Title, UserEligibility, UserId,
};
use parking_lot::Mutex;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Eligibility double with a fixed answer that counts how often it is asked.
struct StubEligibility {
    active: bool,
    calls: AtomicUsize,
}

impl StubEligibility {
    fn new(active: bool) -> Arc<Self> {
        Arc::new(Self {
            active,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl UserEligibility for StubEligibility {
    fn is_user_active(&self, _user: &UserId) -> Result<bool, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.active)
    }
}

#[derive(Default)]
struct RecordingNotifier {
    events: Mutex<Vec<LibraryEvent>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: &LibraryEvent) -> Result<(), CollaboratorError> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}

struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify(&self, _event: &LibraryEvent) -> Result<(), CollaboratorError> {
        Err("mail server unreachable".into())
    }
}

fn title(name: &str) -> Title {
    Title::from(name)
}

fn user(name: &str) -> UserId {
    UserId::from(name)
}

fn active_library() -> Library {
    Library::new(StubEligibility::new(true))
}

// === Catalog ===

#[test]
fn add_copies_accumulates() {
    for name in ["1984", "The Successor"] {
        let library = active_library();

        library.add_copies(&title(name), 1).unwrap();
        assert_eq!(library.available_copies(&title(name)), 1);

        library.add_copies(&title(name), 16).unwrap();
        assert_eq!(library.available_copies(&title(name)), 17);
    }
}

#[test]
fn unknown_title_has_no_copies() {
    let library = active_library();
    assert_eq!(library.available_copies(&title("Unknown")), 0);
}

#[test]
fn titles_are_case_sensitive() {
    let library = active_library();
    library.add_copies(&title("1984"), 2).unwrap();

    assert_eq!(library.available_copies(&title("1984 ")), 0);
    assert!(!library.borrow_book(&title(" 1984"), &user("user")).unwrap());
}

#[test]
fn add_zero_copies_rejected() {
    let library = active_library();

    let result = library.add_copies(&title("1984"), 0);

    assert!(matches!(result, Err(LibraryError::InvalidCopyCount)));
    assert_eq!(library.available_copies(&title("1984")), 0);
    assert!(library.inventory().is_empty());
}

// === Borrowing ===

#[test]
fn borrow_book_active_user() {
    let library = active_library();
    library.add_copies(&title("1984"), 3).unwrap();

    let borrowed = library.borrow_book(&title("1984"), &user("user")).unwrap();

    assert!(borrowed);
    assert_eq!(library.available_copies(&title("1984")), 2);
    assert_eq!(library.copies_on_loan(&title("1984"), &user("user")), 1);
}

#[test]
fn borrow_book_no_copies() {
    let library = active_library();

    let borrowed = library
        .borrow_book(&title("User Story"), &user("user"))
        .unwrap();

    assert!(!borrowed);
    assert_eq!(library.available_copies(&title("User Story")), 0);
}

#[test]
fn borrow_book_inactive_user() {
    let eligibility = StubEligibility::new(false);
    let library = Library::new(eligibility.clone());
    library.add_copies(&title("User Story"), 2).unwrap();

    let borrowed = library
        .borrow_book(&title("User Story"), &user("user"))
        .unwrap();

    assert!(!borrowed);
    assert_eq!(library.available_copies(&title("User Story")), 2);
    assert_eq!(library.copies_on_loan(&title("User Story"), &user("user")), 0);
    assert_eq!(eligibility.calls(), 1);
}

#[test]
fn eligibility_checked_once_even_without_stock() {
    let eligibility = StubEligibility::new(true);
    let library = Library::new(eligibility.clone());

    library.borrow_book(&title("1984"), &user("user")).unwrap();
    library.add_copies(&title("1984"), 1).unwrap();
    library.borrow_book(&title("1984"), &user("user")).unwrap();

    assert_eq!(eligibility.calls(), 2);
}

#[test]
fn returns_never_consult_eligibility() {
    let eligibility = StubEligibility::new(true);
    let library = Library::new(eligibility.clone());
    library.add_copies(&title("1984"), 1).unwrap();
    library.borrow_book(&title("1984"), &user("user")).unwrap();

    library.return_book(&title("1984"), &user("user"));
    library.return_book(&title("1984"), &user("user"));

    assert_eq!(eligibility.calls(), 1);
}

#[test]
fn eligibility_failure_propagates_without_state_change() {
    let offline = |_: &UserId| -> Result<bool, CollaboratorError> {
        Err("user directory offline".into())
    };
    let library = Library::new(Arc::new(offline));
    library.add_copies(&title("1984"), 1).unwrap();

    let result = library.borrow_book(&title("1984"), &user("user"));

    match result {
        Err(LibraryError::Eligibility { user: failed, source }) => {
            assert_eq!(failed, user("user"));
            assert_eq!(source.to_string(), "user directory offline");
        }
        other => panic!("expected eligibility error, got {other:?}"),
    }
    assert_eq!(library.available_copies(&title("1984")), 1);
}

#[test]
fn borrow_until_shelf_is_empty() {
    let library = active_library();
    library.add_copies(&title("1984"), 2).unwrap();

    assert!(library.borrow_book(&title("1984"), &user("a")).unwrap());
    assert!(library.borrow_book(&title("1984"), &user("b")).unwrap());
    assert!(!library.borrow_book(&title("1984"), &user("c")).unwrap());

    assert_eq!(library.available_copies(&title("1984")), 0);
    assert_eq!(library.total_on_loan(&title("1984")), 2);
}

// === Returning ===

#[test]
fn return_book_success() {
    for name in ["1984", "The Successor"] {
        let library = active_library();
        library.add_copies(&title(name), 3).unwrap();
        library.borrow_book(&title(name), &user("user")).unwrap();

        let returned = library.return_book(&title(name), &user("user"));

        assert!(returned);
        assert_eq!(library.available_copies(&title(name)), 3);
        assert_eq!(library.copies_on_loan(&title(name), &user("user")), 0);
    }
}

#[test]
fn return_book_wrong_book() {
    let library = active_library();
    library.add_copies(&title("1984"), 3).unwrap();
    library.borrow_book(&title("1984"), &user("user")).unwrap();

    let returned = library.return_book(&title("The Successor"), &user("user"));

    assert!(!returned);
    assert_eq!(library.available_copies(&title("1984")), 2);
    assert_eq!(library.available_copies(&title("The Successor")), 0);
}

#[test]
fn return_book_wrong_user() {
    let library = active_library();
    library.add_copies(&title("1984"), 3).unwrap();
    library.borrow_book(&title("1984"), &user("user1")).unwrap();

    assert!(!library.return_book(&title("1984"), &user("user2")));
    assert!(!library.return_book(&title("The Successor"), &user("user2")));

    assert_eq!(library.available_copies(&title("1984")), 2);
    assert_eq!(library.copies_on_loan(&title("1984"), &user("user1")), 1);
}

#[test]
fn return_more_than_borrowed_fails() {
    let library = active_library();
    library.add_copies(&title("1984"), 3).unwrap();
    library.borrow_book(&title("1984"), &user("user")).unwrap();
    library.borrow_book(&title("1984"), &user("user")).unwrap();

    assert!(library.return_book(&title("1984"), &user("user")));
    assert!(library.return_book(&title("1984"), &user("user")));
    assert!(!library.return_book(&title("1984"), &user("user")));

    assert_eq!(library.available_copies(&title("1984")), 3);
}

#[test]
fn added_copies_survive_outstanding_loans() {
    let library = active_library();
    library.add_copies(&title("1984"), 1).unwrap();
    library.borrow_book(&title("1984"), &user("user")).unwrap();
    library.add_copies(&title("1984"), 2).unwrap();

    assert!(library.return_book(&title("1984"), &user("user")));
    assert_eq!(library.available_copies(&title("1984")), 3);
}

// === Notifications ===

fn notifying_library(triggers: NotificationTriggers) -> (Library, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let config = LibraryConfig {
        notify: triggers,
        ..LibraryConfig::default()
    };
    let library = Library::with_notifier(StubEligibility::new(true), notifier.clone(), config);
    (library, notifier)
}

#[test]
fn default_triggers_report_borrow_return_and_availability() {
    let (library, notifier) = notifying_library(NotificationTriggers::default());
    library.add_copies(&title("1984"), 1).unwrap();

    library.borrow_book(&title("1984"), &user("user")).unwrap();
    library.borrow_book(&title("1984"), &user("other")).unwrap();
    library.return_book(&title("1984"), &user("user"));

    let events = notifier.events.lock();
    assert_eq!(
        *events,
        vec![
            LibraryEvent::Borrowed {
                title: title("1984"),
                user: user("user"),
            },
            LibraryEvent::Returned {
                title: title("1984"),
                user: user("user"),
            },
            LibraryEvent::Available {
                title: title("1984"),
            },
        ]
    );
}

#[test]
fn availability_only_reported_when_shelf_was_empty() {
    let (library, notifier) = notifying_library(NotificationTriggers {
        available: true,
        ..NotificationTriggers::none()
    });
    library.add_copies(&title("1984"), 2).unwrap();
    library.borrow_book(&title("1984"), &user("user")).unwrap();

    library.return_book(&title("1984"), &user("user"));

    assert!(notifier.events.lock().is_empty());
}

#[test]
fn rejections_reported_when_enabled() {
    let notifier = Arc::new(RecordingNotifier::default());
    let config = LibraryConfig {
        notify: NotificationTriggers::all(),
        ..LibraryConfig::default()
    };
    let library = Library::with_notifier(StubEligibility::new(false), notifier.clone(), config);

    library.borrow_book(&title("1984"), &user("user")).unwrap();

    assert_eq!(
        *notifier.events.lock(),
        vec![LibraryEvent::BorrowRejected {
            title: title("1984"),
            user: user("user"),
            reason: RejectReason::InactiveUser,
        }]
    );
}

#[test]
fn failed_return_sends_nothing() {
    let (library, notifier) = notifying_library(NotificationTriggers::all());

    assert!(!library.return_book(&title("1984"), &user("user")));
    assert!(notifier.events.lock().is_empty());
}

#[test]
fn notifier_failure_does_not_abort_lending() {
    let library = Library::with_notifier(
        StubEligibility::new(true),
        Arc::new(FailingNotifier),
        LibraryConfig {
            notify: NotificationTriggers::all(),
            ..LibraryConfig::default()
        },
    );
    library.add_copies(&title("1984"), 1).unwrap();

    assert!(library.borrow_book(&title("1984"), &user("user")).unwrap());
    assert!(library.return_book(&title("1984"), &user("user")));
    assert_eq!(library.available_copies(&title("1984")), 1);
}

#[test]
fn channel_notifier_receives_events() {
    let (notifier, receiver) = ChannelNotifier::unbounded();
    let library = Library::with_notifier(
        StubEligibility::new(true),
        Arc::new(notifier),
        LibraryConfig::default(),
    );
    library.add_copies(&title("1984"), 1).unwrap();
    library.borrow_book(&title("1984"), &user("user")).unwrap();

    assert_eq!(
        receiver.try_recv().unwrap(),
        LibraryEvent::Borrowed {
            title: title("1984"),
            user: user("user"),
        }
    );
}

// === Fees ===

#[test]
fn library_uses_configured_fee_policy() {
    let config = LibraryConfig {
        fees: FeePolicy {
            base_rate: dec!(1.00),
            ..FeePolicy::default()
        },
        ..LibraryConfig::default()
    };
    let library = Library::with_notifier(
        StubEligibility::new(true),
        Arc::new(library_lending_rs::NoopNotifier),
        config,
    );

    assert_eq!(library.late_fee(4, true, true).unwrap(), dec!(4.80));
    assert!(matches!(
        library.late_fee(-1, false, false),
        Err(LibraryError::InvalidOverdueDays(-1))
    ));
}

// === Scenario ===

#[test]
fn borrow_and_return_scenario() {
    let library = active_library();
    library.add_copies(&title("1984"), 3).unwrap();

    assert!(library.borrow_book(&title("1984"), &user("u")).unwrap());
    assert_eq!(library.available_copies(&title("1984")), 2);

    assert!(library.return_book(&title("1984"), &user("u")));
    assert_eq!(library.available_copies(&title("1984")), 3);
}
