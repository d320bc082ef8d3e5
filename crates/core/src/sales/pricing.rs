//! Line and order totals, payments.

use comptoir_shared::types::{
    MONEY_SCALE, QUANTITY_SCALE, checked_money, ensure_fits, round_money,
};
use rust_decimal::Decimal;
use serde::Serialize;

use super::error::SaleRuleError;
use super::types::{PaymentStatus, SaleLine};

/// Totals of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SaleTotals {
    /// Sum of line totals.
    pub subtotal: Decimal,
    /// Order-level discount.
    pub discount: Decimal,
    /// Tax on the discounted subtotal.
    pub tax: Decimal,
    /// Amount due.
    pub total: Decimal,
}

/// `quantity · unit_price · (1 − discount/100)`, rounded to cents.
///
/// # Errors
///
/// Returns `OutOfRange` if the total overflows or does not fit a money
/// column.
pub fn line_total(line: &SaleLine) -> Result<Decimal, SaleRuleError> {
    let net = line
        .quantity
        .checked_mul(line.unit_price)
        .and_then(|gross| gross.checked_mul(Decimal::ONE_HUNDRED - line.discount_percent))
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED));
    Ok(checked_money(net, "line total")?)
}

fn validate_line(line: &SaleLine) -> Result<(), SaleRuleError> {
    if line.quantity <= Decimal::ZERO {
        return Err(SaleRuleError::NonPositiveQuantity);
    }
    if line.unit_price < Decimal::ZERO {
        return Err(SaleRuleError::NegativePrice);
    }
    if line.discount_percent < Decimal::ZERO || line.discount_percent > Decimal::ONE_HUNDRED {
        return Err(SaleRuleError::InvalidDiscountPercent(line.discount_percent));
    }
    ensure_fits(line.quantity, QUANTITY_SCALE, "quantity")?;
    ensure_fits(line.unit_price, MONEY_SCALE, "unit price")?;
    ensure_fits(line.discount_percent, MONEY_SCALE, "discount percent")?;
    Ok(())
}

/// Computes the totals of a sale.
///
/// # Errors
///
/// Returns an error for an empty sale, an invalid line, an order discount
/// outside `0..=subtotal` or a tax rate outside `0..=100`.
pub fn compute_totals(
    lines: &[SaleLine],
    order_discount: Decimal,
    tax_rate: Decimal,
) -> Result<SaleTotals, SaleRuleError> {
    if lines.is_empty() {
        return Err(SaleRuleError::NoItems);
    }
    for line in lines {
        validate_line(line)?;
    }
    if tax_rate < Decimal::ZERO || tax_rate > Decimal::ONE_HUNDRED {
        return Err(SaleRuleError::InvalidTaxRate(tax_rate));
    }
    ensure_fits(tax_rate, MONEY_SCALE, "tax rate")?;

    let mut subtotal = Decimal::ZERO;
    for line in lines {
        subtotal = checked_money(subtotal.checked_add(line_total(line)?), "subtotal")?;
    }
    if order_discount < Decimal::ZERO || order_discount > subtotal {
        return Err(SaleRuleError::InvalidOrderDiscount {
            discount: order_discount,
            subtotal,
        });
    }
    ensure_fits(order_discount, MONEY_SCALE, "order discount")?;

    let taxable = subtotal - order_discount;
    let tax = round_money(taxable * tax_rate / Decimal::ONE_HUNDRED);

    Ok(SaleTotals {
        subtotal,
        discount: order_discount,
        tax,
        total: checked_money(taxable.checked_add(tax), "total")?,
    })
}

/// Payment status for an amount paid against a total.
#[must_use]
pub fn payment_status(total: Decimal, paid: Decimal) -> PaymentStatus {
    if paid <= Decimal::ZERO {
        PaymentStatus::Unpaid
    } else if paid >= total {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Partial
    }
}

/// Records a payment and returns the new paid amount and status.
///
/// # Errors
///
/// Returns an error for a non-positive amount, one with more than two
/// decimals, or one that exceeds the outstanding balance.
pub fn apply_payment(
    total: Decimal,
    paid: Decimal,
    amount: Decimal,
) -> Result<(Decimal, PaymentStatus), SaleRuleError> {
    if amount <= Decimal::ZERO {
        return Err(SaleRuleError::NonPositivePayment);
    }
    ensure_fits(amount, MONEY_SCALE, "payment amount")?;
    let outstanding = total - paid;
    if amount > outstanding {
        return Err(SaleRuleError::Overpayment {
            amount,
            outstanding,
        });
    }
    let new_paid = paid + amount;
    Ok((new_paid, payment_status(total, new_paid)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn line(quantity: Decimal, unit_price: Decimal, discount_percent: Decimal) -> SaleLine {
        SaleLine {
            product_id: Uuid::new_v4(),
            quantity,
            unit_price,
            discount_percent,
        }
    }

    #[rstest]
    #[case(dec!(2), dec!(10), dec!(0), dec!(20.00))]
    #[case(dec!(3), dec!(9.99), dec!(10), dec!(26.97))]
    #[case(dec!(1.5), dec!(4), dec!(100), dec!(0))]
    fn test_line_total(
        #[case] qty: Decimal,
        #[case] price: Decimal,
        #[case] discount: Decimal,
        #[case] expected: Decimal,
    ) {
        assert_eq!(line_total(&line(qty, price, discount)).unwrap(), expected);
    }

    #[test]
    fn test_compute_totals() {
        let lines = [line(dec!(2), dec!(50), dec!(0)), line(dec!(1), dec!(100), dec!(10))];
        // subtotal 190, discount 10, taxable 180, tax 20% = 36
        let totals = compute_totals(&lines, dec!(10), dec!(20)).unwrap();
        assert_eq!(totals.subtotal, dec!(190));
        assert_eq!(totals.discount, dec!(10));
        assert_eq!(totals.tax, dec!(36));
        assert_eq!(totals.total, dec!(216));
    }

    #[test]
    fn test_compute_totals_rejects_bad_input() {
        assert_eq!(
            compute_totals(&[], dec!(0), dec!(0)),
            Err(SaleRuleError::NoItems)
        );
        assert_eq!(
            compute_totals(&[line(dec!(0), dec!(1), dec!(0))], dec!(0), dec!(0)),
            Err(SaleRuleError::NonPositiveQuantity)
        );
        assert_eq!(
            compute_totals(&[line(dec!(1), dec!(1), dec!(101))], dec!(0), dec!(0)),
            Err(SaleRuleError::InvalidDiscountPercent(dec!(101)))
        );
        assert!(matches!(
            compute_totals(&[line(dec!(1), dec!(10), dec!(0))], dec!(11), dec!(0)),
            Err(SaleRuleError::InvalidOrderDiscount { .. })
        ));
        assert_eq!(
            compute_totals(&[line(dec!(1), dec!(10), dec!(0))], dec!(0), dec!(-1)),
            Err(SaleRuleError::InvalidTaxRate(dec!(-1)))
        );
    }

    #[test]
    fn test_compute_totals_rejects_oversize_figures() {
        let oversize = line(dec!(10000000000000000000000000000), dec!(100), dec!(0));
        assert!(matches!(
            compute_totals(&[oversize], dec!(0), dec!(0)),
            Err(SaleRuleError::OutOfRange(_))
        ));

        // Each factor fits its column but the product does not.
        let wide = line(dec!(999999999999999), dec!(9999999999999999), dec!(0));
        assert!(matches!(
            compute_totals(&[wide], dec!(0), dec!(0)),
            Err(SaleRuleError::OutOfRange(_))
        ));

        let too_precise = line(dec!(0.0004), dec!(10), dec!(0));
        assert!(matches!(
            compute_totals(&[too_precise], dec!(0), dec!(0)),
            Err(SaleRuleError::OutOfRange(_))
        ));

        // Lines that fit on their own but overflow the subtotal together.
        let big = line(dec!(1), dec!(9000000000000000), dec!(0));
        assert!(matches!(
            compute_totals(&[big, big], dec!(0), dec!(0)),
            Err(SaleRuleError::OutOfRange(_))
        ));
    }

    #[rstest]
    #[case(dec!(0), PaymentStatus::Unpaid)]
    #[case(dec!(40), PaymentStatus::Partial)]
    #[case(dec!(100), PaymentStatus::Paid)]
    fn test_payment_status(#[case] paid: Decimal, #[case] expected: PaymentStatus) {
        assert_eq!(payment_status(dec!(100), paid), expected);
    }

    #[test]
    fn test_apply_payment() {
        assert_eq!(
            apply_payment(dec!(100), dec!(0), dec!(30)).unwrap(),
            (dec!(30), PaymentStatus::Partial)
        );
        assert_eq!(
            apply_payment(dec!(100), dec!(30), dec!(70)).unwrap(),
            (dec!(100), PaymentStatus::Paid)
        );
        assert_eq!(
            apply_payment(dec!(100), dec!(30), dec!(71)),
            Err(SaleRuleError::Overpayment {
                amount: dec!(71),
                outstanding: dec!(70),
            })
        );
        assert_eq!(
            apply_payment(dec!(100), dec!(0), dec!(0)),
            Err(SaleRuleError::NonPositivePayment)
        );
    }
}
