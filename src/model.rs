//! Data structures describing the content of an invoice.
//!
//! The types in this module carry no rendering concerns.  They are built once
//! per run by a frontend (such as the command-line collector) and borrowed
//! read-only by [`crate::invoice::layout_invoice`].

/// The party receiving the invoice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Customer {
    /// Company name of the customer.
    pub name: String,
    /// Street address line.
    pub street_address: String,
    /// City name.
    pub city: String,
    /// State or province code.
    pub state: String,
    /// Postal code.
    pub zip_code: String,
}

impl Customer {
    /// Creates a customer from its address fields.
    pub fn new(
        name: impl Into<String>,
        street_address: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            street_address: street_address.into(),
            city: city.into(),
            state: state.into(),
            zip_code: zip_code.into(),
        }
    }

    /// Returns the combined `City, State Zip` line.
    pub fn locality(&self) -> String {
        format!("{}, {} {}", self.city, self.state, self.zip_code)
    }
}

/// The issuing company and its representative.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompanyDetails {
    /// Legal name of the issuing company.
    pub company_name: String,
    /// Company registry identifier (CNPJ).
    pub company_cnpj: String,
    /// Name of the person payments are made out to.
    pub representative_name: String,
    /// Personal registry identifier (CPF) of the representative.
    pub representative_cpf: String,
}

impl CompanyDetails {
    /// Creates company details from the company and representative fields.
    pub fn new(
        company_name: impl Into<String>,
        company_cnpj: impl Into<String>,
        representative_name: impl Into<String>,
        representative_cpf: impl Into<String>,
    ) -> Self {
        Self {
            company_name: company_name.into(),
            company_cnpj: company_cnpj.into(),
            representative_name: representative_name.into(),
            representative_cpf: representative_cpf.into(),
        }
    }
}

/// A single billable entry.
///
/// The total is computed in [`LineItem::new`] and cannot be changed afterwards,
/// so it always equals `unit_price * quantity` for the values it was built
/// from.
#[derive(Clone, Debug, PartialEq)]
pub struct LineItem {
    description: String,
    unit_price: f64,
    quantity: i64,
    total: f64,
}

impl LineItem {
    /// Creates a line item billing `quantity` hours at `unit_price` each.
    pub fn new(description: impl Into<String>, unit_price: f64, quantity: i64) -> Self {
        Self {
            description: description.into(),
            unit_price,
            quantity,
            total: unit_price * quantity as f64,
        }
    }

    /// Returns the description of the work.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the hourly rate.
    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    /// Returns the number of hours billed.
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Returns the computed total.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Label shown in the quantity column, e.g. `10 hrs`.
    pub fn quantity_label(&self) -> String {
        format!("{} hrs", self.quantity)
    }

    /// Label shown in the unit price column, e.g. `$10.000000/hr`.
    pub fn unit_price_label(&self) -> String {
        format!("{}/hr", format_currency(self.unit_price))
    }

    /// Label shown for both the subtotal and the grand total.
    pub fn total_label(&self) -> String {
        format_currency(self.total)
    }
}

/// Formats an amount as dollars with six fractional digits (`$100.000000`).
///
/// Non-finite amounts print as `$+Inf`, `$-Inf` and `$NaN`.
pub fn format_currency(amount: f64) -> String {
    if amount.is_nan() {
        "$NaN".to_owned()
    } else if amount.is_infinite() {
        let sign = if amount.is_sign_positive() { '+' } else { '-' };
        format!("${}Inf", sign)
    } else {
        format!("${:.6}", amount)
    }
}

/// An invoice for exactly one customer, issuer and line item.
#[derive(Clone, Debug, PartialEq)]
pub struct Invoice {
    customer: Customer,
    company: CompanyDetails,
    line_item: LineItem,
}

impl Invoice {
    /// Assembles an invoice from its parts.
    pub fn new(customer: Customer, company: CompanyDetails, line_item: LineItem) -> Self {
        Self {
            customer,
            company,
            line_item,
        }
    }

    /// Returns the customer being billed.
    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    /// Returns the issuing company.
    pub fn company(&self) -> &CompanyDetails {
        &self.company
    }

    /// Returns the billed line item.
    pub fn line_item(&self) -> &LineItem {
        &self.line_item
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn total_matches_product(rate in 0.0f64..1_000_000.0, hours in 0i64..100_000) {
            let item = LineItem::new("Work", rate, hours);
            let expected = rate * hours as f64;
            prop_assert!((item.total() - expected).abs() <= f64::EPSILON * expected.abs().max(1.0));
        }

        #[test]
        fn grand_total_label_matches_subtotal(rate in 0.0f64..10_000.0, hours in 0i64..1_000) {
            let item = LineItem::new("Work", rate, hours);
            prop_assert_eq!(item.total_label(), format_currency(rate * hours as f64));
        }
    }
}
