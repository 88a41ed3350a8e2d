//! Booking CLI commands.
//!
//! - `list` - One page of bookings with filters and sort
//! - `show` - Every field of one booking
//! - `create` / `edit` - Write a booking through the booking form
//! - `delete` - Remove a booking
//! - `quote` - Price and duration for a service and vehicle, offline

use crate::cli::common::{
    fill_form, print_info, print_notice, print_success, print_table, prompt_confirm, submit_form,
    CliContext,
};
use crate::models::{Booking, BookingStatus, ServiceType, VehicleType};
use crate::pricing;
use crate::state::filters::{BookingFilterPatch, StatusFilter};
use crate::state::form::{BookingSchema, FormController, Submitted};
use crate::state::list::{ListController, ListSource, Sort, SortOrder};
use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum BookingsCommand {
    /// List bookings
    List {
        /// Page to show (clamped to the last page)
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        /// Bookings per page (defaults to the configured page size)
        #[arg(short, long)]
        limit: Option<u32>,
        /// Pending, Confirmed, Completed, Cancelled or all
        #[arg(short, long, default_value = "all")]
        status: StatusFilter<BookingStatus>,
        /// Service type, e.g. "Deluxe Wash" or deluxe-wash
        #[arg(long)]
        service: Option<ServiceType>,
        /// Free-text search over customer and car
        #[arg(short = 'q', long)]
        search: Option<String>,
        /// Field to sort by
        #[arg(long, default_value = "date")]
        sort_by: String,
        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,
    },
    /// Show one booking
    Show { id: String },
    /// Create a booking
    Create {
        #[command(flatten)]
        fields: BookingFields,
    },
    /// Edit a booking; only the given fields change
    Edit {
        id: String,
        #[command(flatten)]
        fields: BookingFields,
    },
    /// Delete a booking
    Delete {
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Price and duration for a service on a vehicle type
    Quote {
        #[arg(long)]
        service: ServiceType,
        #[arg(long, default_value = "sedan")]
        vehicle: VehicleType,
    },
}

/// Editable booking fields as command-line flags.
#[derive(Args, Debug, Default)]
pub struct BookingFields {
    #[arg(long)]
    pub customer_name: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub make: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    /// sedan, SUV, hatchback or luxury
    #[arg(long)]
    pub vehicle: Option<VehicleType>,
    #[arg(long)]
    pub service: Option<ServiceType>,
    /// Appointment time, YYYY-MM-DDTHH:MM
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub status: Option<BookingStatus>,
    #[arg(long)]
    pub notes: Option<String>,
    /// Minutes; overrides the derived duration
    #[arg(long)]
    pub duration: Option<String>,
    /// Overrides the derived price
    #[arg(long)]
    pub price: Option<String>,
}

impl BookingFields {
    /// Field writes in application order. Service and vehicle come before
    /// price and duration so explicit values win over derived ones.
    pub fn assignments(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        let mut push = |path: &'static str, value: Option<String>| {
            if let Some(value) = value {
                out.push((path, value));
            }
        };
        push("customerName", self.customer_name.clone());
        push("customerPhone", self.phone.clone());
        push("carDetails.make", self.make.clone());
        push("carDetails.model", self.model.clone());
        push("serviceType", self.service.map(|s| s.to_string()));
        push("carDetails.type", self.vehicle.map(|v| v.to_string()));
        push("date", self.date.clone());
        push("status", self.status.map(|s| s.to_string()));
        push("notes", self.notes.clone());
        push("duration", self.duration.clone());
        push("price", self.price.clone());
        out
    }
}

pub fn execute(ctx: &CliContext, command: BookingsCommand) -> Result<()> {
    match command {
        BookingsCommand::List {
            page,
            limit,
            status,
            service,
            search,
            sort_by,
            asc,
        } => {
            let order = if asc { SortOrder::Asc } else { SortOrder::Desc };
            let patch = BookingFilterPatch {
                status: Some(status),
                service_type: Some(service),
                query: search,
            };
            cmd_list(ctx, page, limit, patch, Sort::new(&sort_by, order))
        }
        BookingsCommand::Show { id } => cmd_show(ctx, &id),
        BookingsCommand::Create { fields } => cmd_create(ctx, &fields),
        BookingsCommand::Edit { id, fields } => cmd_edit(ctx, &id, &fields),
        BookingsCommand::Delete { id, yes } => cmd_delete(ctx, &id, yes),
        BookingsCommand::Quote { service, vehicle } => {
            cmd_quote(service, vehicle);
            Ok(())
        }
    }
}

fn cmd_list(
    ctx: &CliContext,
    page: u32,
    limit: Option<u32>,
    patch: BookingFilterPatch,
    sort: Sort,
) -> Result<()> {
    let limit = limit.unwrap_or(ctx.config.lists.bookings_page_size);
    let mut list = ListController::new(ctx.bookings()?, limit);
    list.set_filter(patch);
    list.set_sort(sort);

    // Page bounds are only known after the first response.
    ctx.runtime.block_on(list.refresh());
    list.set_page(page);
    if list.is_stale() {
        ctx.runtime.block_on(list.refresh());
    }
    if print_notice(list.notices_mut()) {
        bail!("Could not list bookings");
    }

    if list.items().is_empty() {
        print_info(&list.empty_message());
        return Ok(());
    }
    let rows: Vec<Vec<String>> = list.items().iter().map(booking_row).collect();
    print_table(
        &["ID", "Customer", "Vehicle", "Service", "Date", "Price", "Status"],
        &rows,
    );
    println!(
        "\nPage {}/{} ({} bookings)",
        list.page(),
        list.total_pages(),
        list.total_items()
    );
    Ok(())
}

fn booking_row(booking: &Booking) -> Vec<String> {
    vec![
        booking.id.clone(),
        booking.customer_name.clone(),
        booking.vehicle_label(),
        booking
            .service_type
            .map(|s| s.to_string())
            .unwrap_or_default(),
        booking.date.clone().unwrap_or_default(),
        booking.price.map(|p| format!("${}", p)).unwrap_or_default(),
        booking.status.to_string(),
    ]
}

fn cmd_show(ctx: &CliContext, id: &str) -> Result<()> {
    let api = ctx.bookings()?;
    let booking = ctx.runtime.block_on(api.get(id))?;

    let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    println!("Booking {}", booking.id);
    println!("  Customer:  {}", booking.customer_name);
    println!("  Phone:     {}", optional(&booking.customer_phone));
    println!("  Email:     {}", optional(&booking.customer_email));
    println!("  Address:   {}", optional(&booking.customer_address));
    println!(
        "  Car:       {} {} ({})",
        optional(&booking.car_details.make),
        optional(&booking.car_details.model),
        booking
            .car_details
            .vehicle_type
            .map_or("-".to_string(), |v| v.to_string())
    );
    if let Some(service) = booking.service_type {
        println!("  Service:   {} ({})", service, service.description());
    }
    println!("  Date:      {}", optional(&booking.date));
    if let Some(duration) = booking.duration {
        println!("  Duration:  {} min", duration);
    }
    if let Some(price) = booking.price {
        println!("  Price:     ${}", price);
    }
    println!("  Status:    {}", booking.status);
    if !booking.add_ons.is_empty() {
        println!("  Add-ons:   {}", booking.add_ons.join(", "));
    }
    if let Some(notes) = booking.notes.as_deref().filter(|n| !n.is_empty()) {
        println!("  Notes:     {}", notes);
    }
    if let Some(created) = booking.created_at {
        println!("  Created:   {}", created.format("%Y-%m-%d %H:%M"));
    }
    Ok(())
}

fn cmd_create(ctx: &CliContext, fields: &BookingFields) -> Result<()> {
    let mut form = FormController::<BookingSchema, _>::create(ctx.bookings()?);
    let assignments = fields.assignments();
    let pairs: Vec<(&str, &str)> = assignments.iter().map(|(p, v)| (*p, v.as_str())).collect();
    fill_form(&mut form, &pairs)?;

    if let Submitted::Created { id: Some(id) } = submit_form(&ctx.runtime, &mut form)? {
        info!("Created booking {}", id);
        println!("  id: {}", id);
    }
    Ok(())
}

fn cmd_edit(ctx: &CliContext, id: &str, fields: &BookingFields) -> Result<()> {
    let mut form = FormController::<BookingSchema, _>::edit(ctx.bookings()?, id);
    if ctx.runtime.block_on(form.load()).is_err() {
        print_notice(form.notices_mut());
        bail!("Could not load booking {}", id);
    }

    let assignments = fields.assignments();
    if assignments.is_empty() {
        print_info("Nothing to change");
        return Ok(());
    }
    let pairs: Vec<(&str, &str)> = assignments.iter().map(|(p, v)| (*p, v.as_str())).collect();
    fill_form(&mut form, &pairs)?;
    submit_form(&ctx.runtime, &mut form)?;
    Ok(())
}

fn cmd_delete(ctx: &CliContext, id: &str, yes: bool) -> Result<()> {
    if !yes && !prompt_confirm("Are you sure you want to delete this booking?")? {
        print_info("Cancelled");
        return Ok(());
    }
    let api = ctx.bookings()?;
    ctx.runtime.block_on(api.delete(id))?;
    print_success("Booking deleted successfully");
    Ok(())
}

fn cmd_quote(service: ServiceType, vehicle: VehicleType) {
    let quote = pricing::quote(service, vehicle);
    println!("{} on a {}", service, vehicle);
    println!("  {}", service.description());
    println!("  Price:    ${}", quote.price);
    println!("  Duration: {} min", quote.duration_minutes);
}
