use fudosanzei::engine::calculate;
use fudosanzei::{LandType, Number, TaxInput, TransactionType};
use proptest::prelude::*;

fn transaction() -> impl Strategy<Value = TransactionType> {
    prop_oneof![
        Just(TransactionType::Purchase),
        Just(TransactionType::NewBuild),
        Just(TransactionType::Inheritance),
        Just(TransactionType::Gift),
    ]
}

fn land_type() -> impl Strategy<Value = LandType> {
    prop_oneof![Just(LandType::Residential), Just(LandType::Other)]
}

/// m² in hundredths, up to 1,000 m².
fn area() -> impl Strategy<Value = Number> {
    (0i64..=100_000).prop_map(|hundredths| Number::new(hundredths, 100))
}

prop_compose! {
    fn input()(
        transaction in transaction(),
        include_land in any::<bool>(),
        include_building in any::<bool>(),
        land_valuation in 0i64..=10_000_000_000,
        building_valuation in 0i64..=10_000_000_000,
        land_type in land_type(),
        land_area in area(),
        building_area in area(),
        is_residential in any::<bool>(),
        has_housing_certificate in any::<bool>(),
        acquisition_deduction in 0i64..=20_000_000,
    ) -> TaxInput {
        TaxInput {
            include_land,
            include_building,
            land_valuation,
            building_valuation,
            transaction,
            land_type,
            land_area,
            building_area,
            is_residential,
            has_housing_certificate,
            acquisition_deduction,
        }
    }
}

proptest! {
    #[test]
    fn amounts_are_never_negative(input in input()) {
        let result = calculate(&input);
        for amount in [result.land_acq, result.land_reg, result.bldg_acq, result.bldg_reg] {
            prop_assert!(amount >= 0);
        }
    }

    #[test]
    fn totals_add_up(input in input()) {
        let result = calculate(&input);
        prop_assert_eq!(result.total_acq, result.land_acq + result.bldg_acq);
        prop_assert_eq!(result.total_reg, result.land_reg + result.bldg_reg);
        prop_assert_eq!(result.total, result.total_acq + result.total_reg);
    }

    #[test]
    fn excluded_portions_stay_empty(input in input()) {
        let result = calculate(&input);
        if !input.include_land || input.land_valuation == 0 {
            prop_assert_eq!(result.land_acq, 0);
            prop_assert_eq!(result.land_reg, 0);
            prop_assert!(result.process.land_acq.is_empty());
            prop_assert!(result.process.land_reg.is_empty());
        }
        if !input.include_building || input.building_valuation == 0 {
            prop_assert_eq!(result.bldg_acq, 0);
            prop_assert_eq!(result.bldg_reg, 0);
            prop_assert!(result.process.bldg_acq.is_empty());
            prop_assert!(result.process.bldg_reg.is_empty());
        }
    }

    #[test]
    fn registration_tax_is_in_hundreds_with_a_minimum(input in input()) {
        let result = calculate(&input);
        if input.include_land && input.land_valuation > 0 {
            prop_assert!(result.land_reg >= 1_000);
            prop_assert_eq!(result.land_reg % 100, 0);
        }
        if input.include_building && input.building_valuation > 0 {
            prop_assert!(result.bldg_reg >= 1_000);
            prop_assert_eq!(result.bldg_reg % 100, 0);
        }
    }

    #[test]
    fn land_reduction_never_raises_the_tax(input in input()) {
        let result = calculate(&input);
        let base = match input.land_type {
            LandType::Residential => input.land_valuation / 2,
            LandType::Other => input.land_valuation,
        };
        if input.include_land {
            prop_assert!(result.land_acq <= base * 3 / 100);
        }
    }

    #[test]
    fn inheritance_is_exempt_from_acquisition_tax(mut input in input()) {
        input.transaction = TransactionType::Inheritance;
        let result = calculate(&input);
        prop_assert_eq!(result.total_acq, 0);
    }

    #[test]
    fn calculation_is_repeatable(input in input()) {
        prop_assert_eq!(calculate(&input), calculate(&input));
    }
}
