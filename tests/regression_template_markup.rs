//! The widget must mount against full rendered pages, not just the form
//! fragment: doctype, head metadata, csrf token, script includes, and the
//! odd unquoted attribute all appear in real template output.

use guest_selector::BookingPage;

const RENDERED_BOOKING_PAGE: &str = r#"
<!DOCTYPE html>
<html lang="ru">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Booking</title>
  <link rel="stylesheet" href="/static/css/booking.css">
  <style>
    .guest-field > div { cursor: pointer; }
    #guest-popup { position: absolute; }
  </style>
</head>
<body>
  <main class="booking">
    <form id="booking-form" method="post" action="/booking/">
      <input type="hidden" name="csrfmiddlewaretoken" value="5hP3...token">
      <p>
        <label for="id_check_in">Check-in</label>
        <input type="date" name="check_in" class="custom-date-input" required id="id_check_in">
      </p>
      <p>
        <label for="id_check_out">Check-out</label>
        <input type="date" name="check_out" class="custom-date-input" required id="id_check_out">
      </p>
      <div class=guest-field id=guest-field>
        <div id="guest-display">
          Guests: <span id="guest-count">1</span>, children: <span id="children-count">0</span>
        </div>
      </div>
      <div id="guest-popup" style="display: none;">
        <div class="counter-row">
          <button type="button" class="decrement" data-target="guest">&#8722;</button>
          <span id="popup-guest-count">1</span>
          <button type="button" class="increment" data-target="guest">+</button>
        </div>
        <div class="counter-row">
          <button type="button" class="decrement" data-target="children">&#8722;</button>
          <span id="popup-children-count">0</span>
          <button type="button" class="increment" data-target="children">+</button>
        </div>
        <button type="button" id="apply-guests">Apply</button>
      </div>
      <input type="hidden" name="guests" value="1" id="id_guests">
      <input type="hidden" name="children" value="0" id="id_children">
      <button type="submit" id="book">Book now</button>
    </form>
  </main>
  <script src="/static/js/booking.js"></script>
  <script>
    // Inline analytics stub; must stay opaque to the DOM parser.
    if (window.track) { window.track("<booking>"); }
  </script>
</body>
</html>
"#;

#[test]
fn widget_mounts_on_fully_rendered_page() -> guest_selector::Result<()> {
    let mut page = BookingPage::from_html(RENDERED_BOOKING_PAGE)?;
    page.click("#guest-display")?;
    page.click(".increment[data-target=guest]")?;
    page.click("#apply-guests")?;
    page.assert_value("#id_guests", "2")?;
    page.assert_hidden("#guest-popup")?;
    Ok(())
}

#[test]
fn csrf_token_rides_along_in_form_data() -> guest_selector::Result<()> {
    let page = BookingPage::from_html(RENDERED_BOOKING_PAGE)?;
    let data = page.form_data("#booking-form")?;
    assert_eq!(
        data.first(),
        Some(&("csrfmiddlewaretoken".to_string(), "5hP3...token".to_string()))
    );
    Ok(())
}

#[test]
fn unquoted_wrapper_attributes_still_scope_outside_clicks() -> guest_selector::Result<()> {
    // The wrapper div uses unquoted `class`/`id` values; the outside-click
    // check must still recognize clicks inside it.
    let mut page = BookingPage::from_html(RENDERED_BOOKING_PAGE)?;
    page.click("#guest-display")?;
    page.click("#guest-count")?;
    page.assert_visible("#guest-popup")?;
    page.click("#book")?;
    page.assert_hidden("#guest-popup")?;
    Ok(())
}

#[test]
fn head_content_does_not_leak_into_queries() -> guest_selector::Result<()> {
    let page = BookingPage::from_html(RENDERED_BOOKING_PAGE)?;
    // The inline stylesheet mentions #guest-popup; only the real element
    // should match.
    let dump = page.dump_dom("#guest-popup")?;
    assert!(dump.starts_with("<div"));
    Ok(())
}
