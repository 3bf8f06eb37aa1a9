//! Command-line arguments for the invoice binary.

use clap::Parser;
use invoice_pdf::{CompanyDetails, Customer, Invoice, LineItem};
use tracing_subscriber::filter::LevelFilter;

/// Renders a single-page PDF invoice to `invoice.pdf` in the working directory.
///
/// Every option has a default, so the command can run without arguments.
#[derive(Parser, Debug)]
#[command(author, version)]
pub struct Cli {
    /// The name of the company receiving the invoice
    #[arg(long, default_value = "Google, Inc.")]
    pub customer_name: String,

    /// The street address of the company receiving the invoice
    #[arg(long, default_value = "Some street in a fancy area, STE 1999")]
    pub customer_street: String,

    /// The city of the company receiving the invoice
    #[arg(long, default_value = "Palo Alto")]
    pub customer_city: String,

    /// The state of the company receiving the invoice
    #[arg(long, default_value = "CA")]
    pub customer_state: String,

    /// The zip code of the company receiving the invoice
    #[arg(long, default_value = "92201")]
    pub customer_zip: String,

    /// Description of the invoice line item, e.g. "Software engineering services"
    #[arg(long, default_value = "Software Engineering Services")]
    pub work_desc: String,

    /// The amount of hours (qty) shown on the invoice line item
    #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
    pub hours_worked: i64,

    /// How much you are charging per hour
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    pub hourly_rate: f64,

    /// Your company name
    #[arg(long, default_value = "Simpsons Software")]
    pub company_name: String,

    /// Your company's CNPJ number
    #[arg(long, default_value = "12.232.232/0001-22")]
    pub company_cnpj: String,

    /// Your company's representative name
    #[arg(long, default_value = "Bart Simpson")]
    pub rep_name: String,

    /// Your company's representative CPF number
    #[arg(long, default_value = "023.323.323-83")]
    pub rep_cpf: String,

    /// Log level used when RUST_LOG is unset (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: LevelFilter,
}

impl Cli {
    /// Builds the invoice described by the parsed arguments.
    pub fn invoice(&self) -> Invoice {
        let customer = Customer::new(
            self.customer_name.as_str(),
            self.customer_street.as_str(),
            self.customer_city.as_str(),
            self.customer_state.as_str(),
            self.customer_zip.as_str(),
        );
        let company = CompanyDetails::new(
            self.company_name.as_str(),
            self.company_cnpj.as_str(),
            self.rep_name.as_str(),
            self.rep_cpf.as_str(),
        );
        let line_item = LineItem::new(self.work_desc.as_str(), self.hourly_rate, self.hours_worked);

        Invoice::new(customer, company, line_item)
    }
}
