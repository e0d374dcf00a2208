use super::*;

#[test]
fn initial_counters_come_from_display_text() -> Result<()> {
    let page = BookingPage::from_html(BOOKING_FORM_HTML)?;
    assert_eq!(page.guest_count(), 1);
    assert_eq!(page.children_count(), 0);
    Ok(())
}

#[test]
fn clicking_anchor_field_opens_popup() -> Result<()> {
    let mut page = BookingPage::from_html(BOOKING_FORM_HTML)?;
    page.assert_hidden("#guest-popup")?;
    page.click("#guest-display")?;
    page.assert_visible("#guest-popup")?;
    assert!(page.popup_visible());
    Ok(())
}

#[test]
fn increment_buttons_bump_their_own_counter() -> Result<()> {
    let mut page = BookingPage::from_html(BOOKING_FORM_HTML)?;
    page.click("#guest-display")?;
    page.click(".increment[data-target=guest]")?;
    page.click(".increment[data-target=guest]")?;
    page.click(".increment[data-target=children]")?;
    page.assert_text("#popup-guest-count", "3")?;
    page.assert_text("#popup-children-count", "1")?;
    assert_eq!(page.guest_count(), 3);
    assert_eq!(page.children_count(), 1);
    Ok(())
}

#[test]
fn decrement_respects_floors() -> Result<()> {
    let mut page = BookingPage::from_html(BOOKING_FORM_HTML)?;
    page.click(".decrement[data-target=guest]")?;
    page.click(".decrement[data-target=children]")?;
    page.assert_text("#popup-guest-count", "1")?;
    page.assert_text("#popup-children-count", "0")?;
    Ok(())
}

#[test]
fn decrement_after_increment_moves_back_down() -> Result<()> {
    let mut page = BookingPage::from_html(BOOKING_FORM_HTML)?;
    page.click(".increment[data-target=children]")?;
    page.click(".increment[data-target=children]")?;
    page.click(".decrement[data-target=children]")?;
    assert_eq!(page.children_count(), 1);
    Ok(())
}

#[test]
fn apply_commits_counters_and_hides_popup() -> Result<()> {
    let mut page = BookingPage::from_html(BOOKING_FORM_HTML)?;
    page.click("#guest-display")?;
    page.click(".increment[data-target=guest]")?;
    page.click(".increment[data-target=guest]")?;
    page.click(".increment[data-target=children]")?;
    page.click("#apply-guests")?;

    page.assert_text("#guest-count", "3")?;
    page.assert_text("#children-count", "1")?;
    page.assert_value("#id_guests", "3")?;
    page.assert_value("#id_children", "1")?;
    page.assert_hidden("#guest-popup")?;
    Ok(())
}

#[test]
fn counters_before_apply_do_not_touch_hidden_inputs() -> Result<()> {
    let mut page = BookingPage::from_html(BOOKING_FORM_HTML)?;
    page.click(".increment[data-target=guest]")?;
    page.assert_value("#id_guests", "1")?;
    page.assert_text("#guest-count", "1")?;
    Ok(())
}

#[test]
fn form_data_reflects_applied_values_in_tree_order() -> Result<()> {
    let mut page = BookingPage::from_html(BOOKING_FORM_HTML)?;
    page.click(".increment[data-target=guest]")?;
    page.click(".increment[data-target=children]")?;
    page.click("#apply-guests")?;

    let data = page.form_data("#booking-form")?;
    assert_eq!(
        data,
        vec![
            ("check_in".to_string(), String::new()),
            ("check_out".to_string(), String::new()),
            ("guests".to_string(), "2".to_string()),
            ("children".to_string(), "1".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn form_data_requires_a_form_element() -> Result<()> {
    let page = BookingPage::from_html(BOOKING_FORM_HTML)?;
    match page.form_data("#guest-popup") {
        Err(Error::TypeMismatch { expected, .. }) => assert_eq!(expected, "form"),
        other => panic!("expected type mismatch, got: {other:?}"),
    }
    Ok(())
}

#[test]
fn outside_click_hides_popup() -> Result<()> {
    let mut page = BookingPage::from_html(BOOKING_FORM_HTML)?;
    page.click("#guest-display")?;
    page.assert_visible("#guest-popup")?;
    page.click("#id_check_in")?;
    page.assert_hidden("#guest-popup")?;
    Ok(())
}

#[test]
fn document_click_hides_popup() -> Result<()> {
    let mut page = BookingPage::from_html(BOOKING_FORM_HTML)?;
    page.click("#guest-display")?;
    page.click_document()?;
    page.assert_hidden("#guest-popup")?;
    Ok(())
}

#[test]
fn clicks_inside_anchor_or_popup_keep_popup_open() -> Result<()> {
    let mut page = BookingPage::from_html(BOOKING_FORM_HTML)?;
    page.click("#guest-display")?;
    page.click("#guest-count")?;
    page.assert_visible("#guest-popup")?;
    page.click("#popup-children-count")?;
    page.assert_visible("#guest-popup")?;
    Ok(())
}

#[test]
fn unknown_data_target_falls_through() -> Result<()> {
    let html = BOOKING_FORM_HTML.replace(
        r#"<button type="button" class="increment" data-target="guest">+</button>"#,
        r#"<button type="button" class="increment" data-target="pets">+</button>"#,
    );
    let mut page = BookingPage::from_html(&html)?;
    page.click(".increment[data-target=pets]")?;
    assert_eq!(page.guest_count(), 1);
    assert_eq!(page.children_count(), 0);
    Ok(())
}

#[test]
fn disabled_button_swallows_click() -> Result<()> {
    let html = BOOKING_FORM_HTML.replace(
        r#"<button type="button" class="increment" data-target="guest">+</button>"#,
        r#"<button type="button" class="increment" data-target="guest" disabled>+</button>"#,
    );
    let mut page = BookingPage::from_html(&html)?;
    page.click(".increment[data-target=guest]")?;
    assert_eq!(page.guest_count(), 1);
    Ok(())
}

#[test]
fn mount_fails_on_missing_template_element() {
    let html = BOOKING_FORM_HTML.replace("apply-guests", "apply-now");
    match BookingPage::from_html(&html) {
        Err(Error::SelectorNotFound(selector)) => assert_eq!(selector, "#apply-guests"),
        other => panic!("expected missing-element failure, got: {other:?}"),
    }
}

#[test]
fn mount_fails_on_non_numeric_counter_text() {
    let html = BOOKING_FORM_HTML.replace(
        r#"<span id="popup-guest-count">1</span>"#,
        r#"<span id="popup-guest-count">one</span>"#,
    );
    match BookingPage::from_html(&html) {
        Err(Error::TypeMismatch {
            selector, actual, ..
        }) => {
            assert_eq!(selector, "#popup-guest-count");
            assert_eq!(actual, "one");
        }
        other => panic!("expected type mismatch, got: {other:?}"),
    }
}

#[test]
fn mount_honors_custom_widget_ids() -> Result<()> {
    let html = BOOKING_FORM_HTML
        .replace("guest-popup", "party-popup")
        .replace("apply-guests", "apply-party");
    let ids = WidgetIds {
        popup: "party-popup".to_string(),
        apply_button: "apply-party".to_string(),
        ..WidgetIds::default()
    };
    let mut page = BookingPage::from_html_with_ids(&html, &ids)?;
    page.click("#guest-display")?;
    page.assert_visible("#party-popup")?;
    page.click("#apply-party")?;
    page.assert_hidden("#party-popup")?;
    Ok(())
}

#[test]
fn position_places_popup_at_anchor_origin() -> Result<()> {
    let mut page = BookingPage::from_html(BOOKING_FORM_HTML)?;
    // Without mocked geometry the load-time placement lands at the origin.
    page.assert_style("#guest-popup", "top", Some("0"))?;
    page.assert_style("#guest-popup", "left", Some("0"))?;

    page.set_mock_rect("#guest-field", Rect::new(120, 480, 320, 40))?;
    page.reposition()?;
    page.assert_style("#guest-popup", "top", Some("480"))?;
    page.assert_style("#guest-popup", "left", Some("120"))?;
    Ok(())
}

#[test]
fn position_uses_viewport_coordinates_even_when_scrolled() -> Result<()> {
    // The page script assigns getBoundingClientRect output to page-relative
    // style properties, so a scrolled page shifts the placement. Locked in
    // here on purpose.
    let mut page = BookingPage::from_html(BOOKING_FORM_HTML)?;
    page.set_mock_rect("#guest-field", Rect::new(120, 480, 320, 40))?;
    page.set_scroll(0, 100);
    page.reposition()?;
    page.assert_style("#guest-popup", "top", Some("380"))?;
    page.assert_style("#guest-popup", "left", Some("120"))?;
    Ok(())
}

#[test]
fn positioning_preserves_existing_display_declaration() -> Result<()> {
    let mut page = BookingPage::from_html(BOOKING_FORM_HTML)?;
    page.set_mock_rect("#guest-field", Rect::new(10, 20, 100, 30))?;
    page.reposition()?;
    page.assert_hidden("#guest-popup")?;
    page.assert_style("#guest-popup", "display", Some("none"))?;
    Ok(())
}

#[test]
fn trace_logs_record_clicks_and_counter_changes() -> Result<()> {
    let mut page = BookingPage::from_html(BOOKING_FORM_HTML)?;
    page.enable_trace(true);
    page.set_trace_stderr(false);
    page.click(".increment[data-target=guest]")?;
    let logs = page.take_trace_logs();
    assert!(
        logs.iter().any(|line| line.starts_with("[event] click")),
        "missing event line: {logs:?}"
    );
    assert!(
        logs.iter()
            .any(|line| line.contains("increment guests=2 children=0")),
        "missing widget line: {logs:?}"
    );
    assert!(page.take_trace_logs().is_empty());
    Ok(())
}

#[test]
fn trace_log_limit_drops_oldest_entries() -> Result<()> {
    let mut page = BookingPage::from_html(BOOKING_FORM_HTML)?;
    page.enable_trace(true);
    page.set_trace_stderr(false);
    page.set_trace_log_limit(2)?;
    for _ in 0..5 {
        page.click(".increment[data-target=children]")?;
    }
    let logs = page.take_trace_logs();
    assert_eq!(logs.len(), 2);
    assert!(page.set_trace_log_limit(0).is_err());
    Ok(())
}

#[test]
fn counter_accessor_matches_named_accessors() -> Result<()> {
    let mut page = BookingPage::from_html(BOOKING_FORM_HTML)?;
    page.click(".increment[data-target=guest]")?;
    assert_eq!(page.counter(CounterKind::Guest), page.guest_count());
    assert_eq!(page.counter(CounterKind::Children), page.children_count());
    Ok(())
}

mod selectors {
    use super::*;

    #[test]
    fn id_selector_uses_index_fast_path() -> Result<()> {
        let page = BookingPage::from_html(BOOKING_FORM_HTML)?;
        page.assert_exists("#guest-popup")?;
        assert!(matches!(
            page.assert_exists("#missing"),
            Err(Error::SelectorNotFound(_))
        ));
        Ok(())
    }

    #[test]
    fn compound_and_descendant_selectors_match() -> Result<()> {
        let page = BookingPage::from_html(BOOKING_FORM_HTML)?;
        page.assert_exists("button.increment[data-target=children]")?;
        page.assert_exists("#guest-popup .counter-row button")?;
        page.assert_exists("form .guest-field #guest-display")?;
        Ok(())
    }

    #[test]
    fn selector_groups_match_any_branch() -> Result<()> {
        let page = BookingPage::from_html(BOOKING_FORM_HTML)?;
        page.assert_exists("#nope, #guest-display")?;
        Ok(())
    }

    #[test]
    fn quoted_attribute_values_are_supported() -> Result<()> {
        let page = BookingPage::from_html(BOOKING_FORM_HTML)?;
        page.assert_exists(r#"[data-target="guest"]"#)?;
        page.assert_exists("[data-target='children']")?;
        Ok(())
    }

    #[test]
    fn unsupported_selector_is_a_typed_error() -> Result<()> {
        let page = BookingPage::from_html(BOOKING_FORM_HTML)?;
        for bad in ["", "  ", "div:hover", "a > b", "[unclosed", "..x"] {
            assert!(
                matches!(
                    page.assert_exists(bad),
                    Err(Error::UnsupportedSelector(_))
                ),
                "selector {bad:?} should be rejected"
            );
        }
        Ok(())
    }
}

mod markup {
    use super::*;

    #[test]
    fn parser_handles_comments_doctype_and_void_tags() -> Result<()> {
        let html = r#"
            <!DOCTYPE html>
            <!-- rendered by the booking template -->
            <div id="wrap">
              <br>
              <input type="hidden" name="token" value="abc" id="token">
              text
            </div>
        "#;
        let dom = crate::html::parse(html)?;
        let wrap = dom.by_id("wrap").expect("wrap should exist");
        assert!(dom.text_content(wrap).contains("text"));
        let token = dom.by_id("token").expect("token should exist");
        assert_eq!(dom.value(token)?, "abc");
        Ok(())
    }

    #[test]
    fn parser_accepts_unquoted_attribute_values() -> Result<()> {
        let dom = crate::html::parse("<div id=plain class=a-b data-target=guest></div>")?;
        let node = dom.by_id("plain").expect("element should exist");
        assert_eq!(dom.attr(node, "data-target").as_deref(), Some("guest"));
        assert!(dom.has_class(node, "a-b"));
        Ok(())
    }

    #[test]
    fn parser_decodes_common_entities_in_text_and_attrs() -> Result<()> {
        let dom = crate::html::parse(r#"<p id="p" title="a &amp; b">Tom &amp; Jerry</p>"#)?;
        let node = dom.by_id("p").expect("element should exist");
        assert_eq!(dom.text_content(node), "Tom & Jerry");
        assert_eq!(dom.attr(node, "title").as_deref(), Some("a & b"));
        Ok(())
    }

    #[test]
    fn parser_treats_script_and_style_bodies_as_raw_text() -> Result<()> {
        let html = r#"
            <div id="result">ok</div>
            <script>if (1 < 2) { console.log("<div>not markup</div>"); }</script>
            <style>.x > .y { color: red; }</style>
        "#;
        let dom = crate::html::parse(html)?;
        let result = dom.by_id("result").expect("element should exist");
        assert_eq!(dom.text_content(result), "ok");
        assert!(dom.by_id("div").is_none());
        Ok(())
    }

    #[test]
    fn parser_rejects_unclosed_comment() {
        match crate::html::parse("<div><!-- oops</div>") {
            Err(Error::HtmlParse(msg)) => assert!(msg.contains("comment")),
            other => panic!("expected parse failure, got: {other:?}"),
        }
    }

    #[test]
    fn parser_recovers_from_stray_end_tags() -> Result<()> {
        let dom = crate::html::parse("<div id='a'></span><span id='b'>x</span></div>")?;
        assert!(dom.by_id("a").is_some());
        let b = dom.by_id("b").expect("span should exist");
        assert_eq!(dom.text_content(b), "x");
        Ok(())
    }
}

mod styles {
    use super::*;

    #[test]
    fn display_toggle_preserves_other_declarations() -> Result<()> {
        let mut dom =
            crate::html::parse(r#"<div id="x" style="color: red; display: none;"></div>"#)?;
        let node = dom.by_id("x").expect("element should exist");
        dom.set_style_property(node, "display", "block")?;
        assert_eq!(dom.style_property(node, "color").as_deref(), Some("red"));
        assert_eq!(
            dom.style_property(node, "display").as_deref(),
            Some("block")
        );
        Ok(())
    }

    #[test]
    fn quoted_semicolons_do_not_split_declarations() -> Result<()> {
        let mut dom = crate::html::parse(
            r#"<div id="x" style="background: url('a;b.png'); color: blue;"></div>"#,
        )?;
        let node = dom.by_id("x").expect("element should exist");
        assert_eq!(
            dom.style_property(node, "background").as_deref(),
            Some("url('a;b.png')")
        );
        dom.set_style_property(node, "color", "green")?;
        assert_eq!(
            dom.style_property(node, "background").as_deref(),
            Some("url('a;b.png')")
        );
        Ok(())
    }
}
