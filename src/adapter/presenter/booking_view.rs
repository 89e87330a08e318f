use crate::adapter::presenter::calendar_view::render_calendar;
use crate::application::booking_flow::{FlowStage, PaymentStage, ReviewStage, ScheduleStage};
use crate::entity::booking::PaymentReceipt;
use crate::entity::datetime::{format_12_hour, format_24_hour, format_long_date, format_short_date};
use crate::entity::pricing::{format_rupiah, total_price, HOURLY_RATE};
use crate::entity::venue::Venue;

#[cfg(test)]
use crate::entity::booking::{PaymentHandoff, ReviewHandoff, ScheduleHandoff};
#[cfg(test)]
use crate::entity::payment_method::{PaymentMethodCatalog, PaymentMethodOption};
#[cfg(test)]
use crate::entity::venue::Sport;
#[cfg(test)]
use chrono::NaiveDate;

const STAGE_NAMES: [&str; 4] = ["Select Schedule", "Review Order", "Payment", "Payment Confirmation"];

pub fn render_venue_line(venue: &Venue) -> String {
    let new_mark = if venue.is_new() { " [NEW]" } else { "" };
    format!(
        "{}: {} ({}, {}) ★{:.1} {:.1} km{}",
        venue.get_id(),
        venue.get_name(),
        venue.get_location(),
        venue.get_sport(),
        venue.get_rating(),
        venue.get_distance_km(),
        new_mark
    )
}

pub fn render_venue_detail(venue: &Venue) -> Vec<String> {
    vec![
        format!("{} ({})", venue.get_name(), venue.get_sport()),
        format!("  {}", venue.get_address()),
        format!(
            "  ★{:.1}  {:.1} km from you",
            venue.get_rating(),
            venue.get_distance_km()
        ),
        format!("  {} / hour", format_rupiah(HOURLY_RATE)),
    ]
}

// 現在の段階を[]で囲む
pub fn render_progress(stage: &FlowStage) -> String {
    STAGE_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if *name == stage.name() {
                format!("[{} {}]", i + 1, name)
            } else {
                format!("{} {}", i + 1, name)
            }
        })
        .collect::<Vec<_>>()
        .join(" > ")
}

pub fn render_schedule(stage: &ScheduleStage, styled: bool) -> Vec<String> {
    let venue = stage.get_venue();
    let draft = stage.get_draft();
    let mut lines = vec![format!("{} - {}", venue.get_name(), venue.get_location())];

    lines.extend(render_calendar(&stage.get_month(), &stage.weeks(), styled));

    match draft.get_selected_date() {
        Some(date) => {
            let start = draft.get_start_time();
            let end = draft.get_end_time();
            lines.push(format!("Date:  {}", format_short_date(&date)));
            lines.push(format!(
                "Time:  {} - {}",
                format_12_hour(&start),
                format_12_hour(&end)
            ));
            lines.push(format!(
                "Total: {} hour(s), {}",
                draft.get_duration_hours(),
                format_rupiah(total_price(&start, &end))
            ));
        }
        None => {
            lines.push("Pick a date with `date <day>`".to_string());
        }
    }

    lines
}

pub fn render_review(stage: &ReviewStage) -> Vec<String> {
    let handoff = stage.get_handoff();
    let mut lines = vec![
        handoff.venue_name.to_string(),
        format!("  {}", handoff.venue_location),
        format!("  {}", format_long_date(&handoff.selected_date)),
    ];

    for slot in stage.time_slots().iter() {
        lines.push(format!(
            "  {} - {}  {}",
            format_24_hour(&slot.get_start()),
            format_24_hour(&slot.get_end()),
            format_rupiah(slot.get_price())
        ));
    }

    lines.push(format!(
        "Total ({} hour(s)): {}",
        stage.duration_hours(),
        format_rupiah(stage.total_price())
    ));
    lines
}

pub fn render_payment(stage: &PaymentStage) -> Vec<String> {
    let selected_id = stage.get_selected().map(|option| option.get_id());
    let mut lines = vec![format!(
        "Subtotal: {}",
        format_rupiah(stage.get_handoff().total_price)
    )];

    for option in stage.get_catalog().get_options().iter() {
        let radio = if Some(option.get_id()) == selected_id {
            "(*)"
        } else {
            "( )"
        };
        let fee = if option.get_fee() > 0 {
            format!("+{}", format_rupiah(option.get_fee()))
        } else {
            String::new()
        };
        let expand = if option.is_expandable() { " >" } else { "" };

        let mut line = format!(
            "  {} {}: {} {}{}",
            radio,
            option.get_id(),
            option.get_display_name(),
            fee,
            expand
        );
        if let Some(reason) = option.get_disabled_reason() {
            line += &format!(" ({})", reason);
        }
        lines.push(line.trim_end().to_string());
    }

    lines.push(format!("Total payment: {}", format_rupiah(stage.total_payment())));
    lines
}

pub fn render_receipt(receipt: &PaymentReceipt) -> Vec<String> {
    let mut lines = vec![
        "Payment successful".to_string(),
        format!("Order {}", receipt.get_order_id()),
        format!(
            "{} / {}",
            receipt.get_venue_name(),
            format_long_date(&receipt.get_selected_date())
        ),
    ];

    for booked in receipt.get_booked_slots().iter() {
        lines.push(format!(
            "  {} - {}  {}",
            format_24_hour(&booked.get_slot().get_start()),
            format_24_hour(&booked.get_slot().get_end()),
            booked.get_booking_id()
        ));
    }

    lines.push(format!(
        "Paid with {}: {} + fee {} = {}",
        receipt.get_payment_method().get_display_name(),
        format_rupiah(receipt.get_subtotal()),
        format_rupiah(receipt.get_fee()),
        format_rupiah(receipt.get_total_payment())
    ));
    lines
}

pub fn render_stage(stage: &FlowStage, styled: bool) -> Vec<String> {
    let mut lines = vec![render_progress(stage)];

    let body = match stage {
        FlowStage::Schedule(schedule) => render_schedule(schedule, styled),
        FlowStage::Review(review) => render_review(review),
        FlowStage::Payment(payment) => render_payment(payment),
        FlowStage::Confirmed(receipt) => render_receipt(receipt),
    };
    lines.extend(body);

    lines
}

#[cfg(test)]
fn review_stage() -> ReviewStage {
    let date = NaiveDate::from_ymd_opt(2025, 4, 8).unwrap();
    ReviewStage::new(ScheduleHandoff {
        venue_name: "Rekket Space BSD".to_string(),
        venue_location: "BSD".to_string(),
        selected_date: date,
        start_time: date.and_hms_opt(14, 30, 0).unwrap(),
        end_time: date.and_hms_opt(16, 30, 0).unwrap(),
    })
}

#[test]
fn test_render_review_24時間表記で枠ごとに表示すること() {
    let actual = render_review(&review_stage());

    assert_eq!(
        actual,
        vec![
            "Rekket Space BSD",
            "  BSD",
            "  Tuesday, 8 Apr 2025",
            "  14:30 - 15:30  Rp 59.000",
            "  15:30 - 16:30  Rp 59.000",
            "Total (2 hour(s)): Rp 118.000",
        ]
    );
}

#[test]
fn test_render_payment_選択中と利用不可の理由を表示すること() {
    let catalog = PaymentMethodCatalog::new(vec![
        PaymentMethodOption::new("virtual_account", "Virtual Account", 0).expandable(),
        PaymentMethodOption::new("ovo", "OVO", 3478).disabled("under maintenance"),
    ]);
    let stage = PaymentStage::new(review_stage().submit(), &catalog);

    let actual = render_payment(&stage);

    assert_eq!(actual[0], "Subtotal: Rp 118.000");
    assert_eq!(actual[1], "  (*) virtual_account: Virtual Account  >");
    assert_eq!(actual[2], "  ( ) ovo: OVO +Rp 3.478 (under maintenance)");
    assert_eq!(actual[3], "Total payment: Rp 118.000");
}

#[test]
fn test_render_progress_現在の段階を強調すること() {
    let stage = FlowStage::Review(review_stage());

    assert_eq!(
        render_progress(&stage),
        "1 Select Schedule > [2 Review Order] > 3 Payment > 4 Payment Confirmation"
    );
}

#[test]
fn test_render_receipt_手数料込みの合計() {
    let method = PaymentMethodOption::new("alfamart", "Alfamart", 6500);
    let payment = PaymentHandoff {
        payment_method: "alfamart".to_string(),
        total_price: 118_000,
    };
    let review: ReviewHandoff = review_stage().submit();
    let receipt = PaymentReceipt::issue(&review, &payment, &method, "5", &review.selected_date);

    let actual = render_receipt(&receipt);

    assert_eq!(actual.len(), 3 + 2 + 1);
    assert_eq!(
        actual.last().unwrap(),
        "Paid with Alfamart: Rp 118.000 + fee Rp 6.500 = Rp 124.500"
    );
}

#[test]
fn test_render_venue_line_新着の印() {
    let venue = Venue::new("4", "Royal Badminton", "Serpong", Sport::Badminton)
        .with_rating(4.5)
        .with_distance_km(3.0)
        .with_is_new(true);

    assert_eq!(
        render_venue_line(&venue),
        "4: Royal Badminton (Serpong, Badminton) ★4.5 3.0 km [NEW]"
    );
}
