// Property-Based Testing for the verification and purchase state machines
// Drives arbitrary event sequences and checks the invariants hold for all of them

use artify::pricing::{self, FrameOption, PrintSize, PurchaseOptions};
use artify::transaction::{PurchaseEvent, PurchaseLifecycle, TransactionStatus, TransactionStatusExt};
use artify::verification::{
    ScanOutcome, TagVerification, VerificationEvent, VerificationStatus, VerificationStatusExt,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use statig::prelude::*;

fn verification_event_strategy() -> impl Strategy<Value = VerificationEvent> {
    prop_oneof![
        3 => Just(VerificationEvent::StartScan),
        2 => Just(VerificationEvent::ScanResolved(ScanOutcome::Pass)),
        2 => Just(VerificationEvent::ScanResolved(ScanOutcome::mismatch())),
        1 => Just(VerificationEvent::Dismiss),
    ]
}

fn purchase_event_strategy() -> impl Strategy<Value = PurchaseEvent> {
    prop_oneof![
        Just(PurchaseEvent::AttemptPurchase { verified: false }),
        Just(PurchaseEvent::VerificationDismissed),
        Just(PurchaseEvent::PaymentDeclined {
            reason: "declined".to_string()
        }),
    ]
}

fn size_strategy() -> impl Strategy<Value = PrintSize> {
    prop_oneof![
        Just(PrintSize::Small),
        Just(PrintSize::Original),
        Just(PrintSize::Large),
    ]
}

fn frame_strategy() -> impl Strategy<Value = FrameOption> {
    prop_oneof![
        Just(FrameOption::None),
        Just(FrameOption::Wood),
        Just(FrameOption::Metal),
        Just(FrameOption::Floating),
    ]
}

proptest! {
    #[test]
    fn each_attempt_resolves_to_exactly_one_outcome(
        events in prop::collection::vec(verification_event_strategy(), 1..60)
    ) {
        let mut sm = TagVerification::new("artwork-123", "nfc-7d8e9f-art123").state_machine();
        // Outcome seen per attempt number
        let mut resolved: Vec<Option<VerificationStatus>> = vec![None];

        for event in &events {
            let before = sm.status();
            let attempts_before = sm.inner().attempts();
            sm.handle(event);
            let after = sm.status();
            let attempts = sm.inner().attempts() as usize;

            // A second start while scanning never opens another attempt.
            if before == VerificationStatus::Scanning {
                prop_assert_eq!(sm.inner().attempts(), attempts_before);
            }

            if resolved.len() <= attempts {
                resolved.resize(attempts + 1, None);
            }
            if before == VerificationStatus::Scanning && after != VerificationStatus::Scanning {
                prop_assert!(resolved[attempts].is_none(), "attempt {} resolved twice", attempts);
                prop_assert!(matches!(after, VerificationStatus::Verified | VerificationStatus::Failed));
                resolved[attempts] = Some(after);
            }

            // Verified is terminal.
            if before == VerificationStatus::Verified {
                prop_assert_eq!(after, VerificationStatus::Verified);
            }
            prop_assert_eq!(
                sm.inner().failure_reason().is_some(),
                after == VerificationStatus::Failed
            );
        }
    }

    #[test]
    fn unverified_purchase_never_passes_the_gate(
        events in prop::collection::vec(purchase_event_strategy(), 1..40)
    ) {
        let mut sm = PurchaseLifecycle::new("artwork-123", "collector-1").state_machine();
        for event in &events {
            sm.handle(event);
            prop_assert!(matches!(
                sm.status(),
                TransactionStatus::Idle | TransactionStatus::AwaitingVerification
            ));
            prop_assert!(sm.inner().receipt().is_none());
        }
    }

    #[test]
    fn total_is_rounded_two_percent_over_base(base in 1i64..10_000_000) {
        let base = Decimal::from(base);
        let total = pricing::total_price(base, Decimal::new(2, 2)).unwrap();
        let exact = base * Decimal::new(102, 2);
        prop_assert!(total >= base);
        prop_assert!((total - exact).abs() <= Decimal::new(5, 1));
        prop_assert_eq!(total.fract(), Decimal::ZERO);
    }

    #[test]
    fn quote_always_tracks_selected_options(
        list in 1i64..100_000,
        size in size_strategy(),
        frame in frame_strategy(),
    ) {
        let list = Decimal::from(list);
        let options = PurchaseOptions { size, frame };
        let quote = pricing::quote(list, options, Decimal::new(2, 2), "USD").unwrap();

        prop_assert_eq!(quote.base_price, list * size.multiplier() + frame.surcharge());
        prop_assert_eq!(quote.base_price + quote.authentication_fee, quote.total_price);
        prop_assert_eq!(
            quote.total_price,
            pricing::total_price(quote.base_price, Decimal::new(2, 2)).unwrap()
        );
    }
}
