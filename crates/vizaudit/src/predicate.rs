//! The audit's matching predicate.
//!
//! A visualization object matches when it combines a static date filter, a
//! previous-period comparison, and slicing by an attribute that is not the
//! per-day date attribute. The three conditions are checked in that order
//! and only the last one needs remote calls, so it runs only when the first
//! two already hold.

use log::trace;

use vizaudit_core::{Filter, MeasureDefinition, VisualizationObject};

use crate::{AuditError, MetadataService, cache::DisplayFormCache};

/// Returns whether any filter of `object` is pinned to a fixed date range.
pub fn has_static_date_filter(object: &VisualizationObject) -> bool {
    object
        .filters()
        .iter()
        .any(|filter| matches!(filter, Filter::AbsoluteDate(_)))
}

/// Returns whether any measure of `object` compares against the previous
/// period.
pub fn has_previous_period_comparison(object: &VisualizationObject) -> bool {
    object
        .measures()
        .any(|measure| matches!(measure.definition, MeasureDefinition::PreviousPeriod(_)))
}

/// Returns whether any attribute of `object` resolves to something other
/// than the per-day date attribute.
///
/// Stops at the first such attribute. Resolutions go through `cache`.
pub fn is_sliced_by_non_day_attribute<S>(
    object: &VisualizationObject,
    service: &mut S,
    cache: &mut DisplayFormCache,
) -> Result<bool, AuditError>
where
    S: MetadataService + ?Sized,
{
    for attribute in object.attributes() {
        if cache.is_non_day(attribute.display_form_uri(), service)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Evaluates the full predicate against `object`.
///
/// # Errors
///
/// Propagates failures to resolve a display form or attribute.
pub fn matches<S>(
    object: &VisualizationObject,
    service: &mut S,
    cache: &mut DisplayFormCache,
) -> Result<bool, AuditError>
where
    S: MetadataService + ?Sized,
{
    if !has_static_date_filter(object) {
        trace!(uri:? = object.uri(); "No static date filter");
        return Ok(false);
    }

    if !has_previous_period_comparison(object) {
        trace!(uri:? = object.uri(); "No previous period measure");
        return Ok(false);
    }

    is_sliced_by_non_day_attribute(object, service, cache)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use vizaudit_core::{
        Bucket, BucketItem, DAY_DATE_TYPE, Measure, ObjQualifier, VisualizationAttribute,
        visualization::{
            AbsoluteDateFilter, AttributeFilter, PopMeasureDefinition,
            PreviousPeriodMeasureDefinition, RelativeDateFilter, SimpleMeasureDefinition,
        },
    };

    use crate::{InMemoryService, memory::Call};

    use super::*;

    const DAY_FORM: &str = "/gdc/md/P/obj/101";
    const MONTH_FORM: &str = "/gdc/md/P/obj/201";
    const REGION_FORM: &str = "/gdc/md/P/obj/301";

    fn service() -> InMemoryService {
        InMemoryService::new()
            .with_display_form(DAY_FORM, "/gdc/md/P/obj/100")
            .with_attribute("/gdc/md/P/obj/100", Some(DAY_DATE_TYPE))
            .with_display_form(MONTH_FORM, "/gdc/md/P/obj/200")
            .with_attribute("/gdc/md/P/obj/200", Some("GDC.time.month"))
            .with_display_form(REGION_FORM, "/gdc/md/P/obj/300")
            .with_attribute("/gdc/md/P/obj/300", None)
    }

    fn absolute_date() -> Filter {
        Filter::AbsoluteDate(AbsoluteDateFilter::new(
            "/gdc/md/P/obj/9",
            "2019-01-01",
            "2019-12-31",
        ))
    }

    fn relative_date() -> Filter {
        Filter::RelativeDate(RelativeDateFilter::new(
            "/gdc/md/P/obj/9",
            "GDC.time.year",
            -1,
            -1,
        ))
    }

    fn simple_measure() -> BucketItem {
        BucketItem::Measure(Measure::new(
            "m1",
            MeasureDefinition::Simple(SimpleMeasureDefinition::new("/gdc/md/P/obj/1")),
        ))
    }

    fn previous_period_measure() -> BucketItem {
        BucketItem::Measure(Measure::new(
            "m1_pp",
            MeasureDefinition::PreviousPeriod(PreviousPeriodMeasureDefinition::new("m1")),
        ))
    }

    fn attribute(display_form: &str) -> BucketItem {
        BucketItem::Attribute(VisualizationAttribute::new("a1", display_form))
    }

    fn chart(
        filters: Vec<Filter>,
        measures: Vec<BucketItem>,
        attributes: Vec<BucketItem>,
    ) -> VisualizationObject {
        let mut object = VisualizationObject::new("/gdc/md/P/obj/42")
            .with_bucket(Bucket::new("measures", measures))
            .with_bucket(Bucket::new("view", attributes));
        for filter in filters {
            object = object.with_filter(filter);
        }
        object
    }

    #[test]
    fn test_all_three_conditions_match() {
        let object = chart(
            vec![absolute_date()],
            vec![simple_measure(), previous_period_measure()],
            vec![attribute(MONTH_FORM)],
        );

        let mut service = service();
        let mut cache = DisplayFormCache::new();
        assert!(matches(&object, &mut service, &mut cache).unwrap());
    }

    #[test]
    fn test_relative_date_filter_does_not_match() {
        let object = chart(
            vec![relative_date()],
            vec![previous_period_measure()],
            vec![attribute(MONTH_FORM)],
        );

        let mut service = service();
        let mut cache = DisplayFormCache::new();
        assert!(!matches(&object, &mut service, &mut cache).unwrap());
    }

    #[test]
    fn test_period_over_period_is_not_previous_period() {
        let pop = BucketItem::Measure(Measure::new(
            "m1_pop",
            MeasureDefinition::PeriodOverPeriod(PopMeasureDefinition {
                measure_identifier: "m1".to_string(),
                pop_attribute: ObjQualifier::uri("/gdc/md/P/obj/15"),
            }),
        ));
        let object = chart(vec![absolute_date()], vec![pop], vec![attribute(MONTH_FORM)]);

        let mut service = service();
        let mut cache = DisplayFormCache::new();
        assert!(!matches(&object, &mut service, &mut cache).unwrap());
    }

    #[test]
    fn test_day_only_slicing_does_not_match() {
        let object = chart(
            vec![absolute_date()],
            vec![previous_period_measure()],
            vec![attribute(DAY_FORM)],
        );

        let mut service = service();
        let mut cache = DisplayFormCache::new();
        assert!(!matches(&object, &mut service, &mut cache).unwrap());
    }

    #[test]
    fn test_untyped_attribute_counts_as_non_day() {
        let object = chart(
            vec![absolute_date()],
            vec![previous_period_measure()],
            vec![attribute(REGION_FORM)],
        );

        let mut service = service();
        let mut cache = DisplayFormCache::new();
        assert!(matches(&object, &mut service, &mut cache).unwrap());
    }

    #[test]
    fn test_no_attributes_does_not_match() {
        let object = chart(vec![absolute_date()], vec![previous_period_measure()], vec![]);

        let mut service = service();
        let mut cache = DisplayFormCache::new();
        assert!(!matches(&object, &mut service, &mut cache).unwrap());
        assert!(service.calls().is_empty());
    }

    #[test]
    fn test_missing_filter_skips_resolution() {
        let object = chart(vec![], vec![previous_period_measure()], vec![attribute(MONTH_FORM)]);

        let mut service = service();
        let mut cache = DisplayFormCache::new();
        assert!(!matches(&object, &mut service, &mut cache).unwrap());
        assert!(service.calls().is_empty());
    }

    #[test]
    fn test_missing_previous_period_skips_resolution() {
        let object = chart(vec![absolute_date()], vec![simple_measure()], vec![attribute(MONTH_FORM)]);

        let mut service = service();
        let mut cache = DisplayFormCache::new();
        assert!(!matches(&object, &mut service, &mut cache).unwrap());
        assert!(service.calls().is_empty());
    }

    #[test]
    fn test_resolution_stops_at_first_non_day_attribute() {
        let object = chart(
            vec![absolute_date()],
            vec![previous_period_measure()],
            vec![attribute(DAY_FORM), attribute(MONTH_FORM), attribute(REGION_FORM)],
        );

        let mut service = service();
        let mut cache = DisplayFormCache::new();
        assert!(matches(&object, &mut service, &mut cache).unwrap());

        assert_eq!(
            service.calls(),
            &[
                Call::GetDisplayForm(DAY_FORM.to_string()),
                Call::GetAttribute("/gdc/md/P/obj/100".to_string()),
                Call::GetDisplayForm(MONTH_FORM.to_string()),
                Call::GetAttribute("/gdc/md/P/obj/200".to_string()),
            ]
        );
        assert_eq!(cache.get(REGION_FORM), None);
    }

    #[test]
    fn test_unresolvable_display_form_propagates() {
        let object = chart(
            vec![absolute_date()],
            vec![previous_period_measure()],
            vec![attribute("/gdc/md/P/obj/404")],
        );

        let mut service = service();
        let mut cache = DisplayFormCache::new();
        let result = matches(&object, &mut service, &mut cache);
        assert!(matches!(result, Err(AuditError::NotFound { uri }) if uri == "/gdc/md/P/obj/404"));
    }

    // ===================
    // Property Tests
    // ===================

    fn filter_strategy() -> impl Strategy<Value = Filter> {
        prop_oneof![
            Just(absolute_date()),
            Just(relative_date()),
            Just(Filter::PositiveAttribute(AttributeFilter {
                display_form: ObjQualifier::uri(REGION_FORM)
            })),
            Just(Filter::Other("measureValueFilter".to_string())),
        ]
    }

    fn measure_strategy() -> impl Strategy<Value = BucketItem> {
        prop_oneof![
            Just(simple_measure()),
            Just(previous_period_measure()),
            Just(BucketItem::Measure(Measure::new(
                "m_other",
                MeasureDefinition::Other("overPeriodMeasure".to_string())
            ))),
        ]
    }

    fn attribute_strategy() -> impl Strategy<Value = BucketItem> {
        prop_oneof![
            Just(attribute(DAY_FORM)),
            Just(attribute(MONTH_FORM)),
            Just(attribute(REGION_FORM)),
        ]
    }

    fn check_matches_iff_all_three_hold(
        filters: Vec<Filter>,
        measures: Vec<BucketItem>,
        attributes: Vec<BucketItem>,
    ) -> Result<(), TestCaseError> {
        let has_filter = filters.iter().any(|f| matches!(f, Filter::AbsoluteDate(_)));
        let has_pp = measures.iter().any(|m| {
            matches!(
                m,
                BucketItem::Measure(Measure {
                    definition: MeasureDefinition::PreviousPeriod(_),
                    ..
                })
            )
        });
        let has_non_day = attributes.iter().any(|a| {
            matches!(a, BucketItem::Attribute(attr) if attr.display_form_uri() != DAY_FORM)
        });

        let object = chart(filters, measures, attributes);
        let mut service = service();
        let mut cache = DisplayFormCache::new();

        let result = matches(&object, &mut service, &mut cache)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        prop_assert_eq!(result, has_filter && has_pp && has_non_day);
        if !(has_filter && has_pp) {
            prop_assert!(service.calls().is_empty());
        }
        Ok(())
    }

    fn check_cache_agrees_with_fresh_resolution(
        attributes: Vec<BucketItem>,
    ) -> Result<(), TestCaseError> {
        let object = chart(vec![absolute_date()], vec![previous_period_measure()], attributes);

        let mut shared_service = service();
        let mut shared_cache = DisplayFormCache::new();
        let first = matches(&object, &mut shared_service, &mut shared_cache)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let calls_after_first = shared_service.calls().len();
        let second = matches(&object, &mut shared_service, &mut shared_cache)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        let mut fresh_service = service();
        let mut fresh_cache = DisplayFormCache::new();
        let fresh = matches(&object, &mut fresh_service, &mut fresh_cache)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        prop_assert_eq!(first, second);
        prop_assert_eq!(first, fresh);
        prop_assert_eq!(shared_service.calls().len(), calls_after_first);
        Ok(())
    }

    proptest! {
        #[test]
        fn matches_iff_all_three_hold(
            filters in prop::collection::vec(filter_strategy(), 0..4),
            measures in prop::collection::vec(measure_strategy(), 0..4),
            attributes in prop::collection::vec(attribute_strategy(), 0..4),
        ) {
            check_matches_iff_all_three_hold(filters, measures, attributes)?;
        }

        #[test]
        fn cache_agrees_with_fresh_resolution(
            attributes in prop::collection::vec(attribute_strategy(), 0..6),
        ) {
            check_cache_agrees_with_fresh_resolution(attributes)?;
        }
    }
}
