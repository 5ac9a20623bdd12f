//! Authoritative record of users, companies, customers, invoices, and
//! expenses.
//!
//! The store is an in-process concurrent map per entity. Method signatures
//! are async and fallible so a durable backend can be substituted behind
//! the same seams without touching callers; today no operation can
//! actually fail.
//!
//! Invoice creation is the one place that needs more than per-record
//! atomicity: the next invoice number is derived from the numbers already
//! in use, so allocation and insert happen under a single lock. Two
//! concurrent creations under the same prefix can therefore never be
//! handed the same number.

use crate::dtos::{
    CompanyPatch, CreateCustomerRequest, CreateExpenseRequest, CreateInvoiceRequest,
    CustomerPatch, InvoicePatch, LineItemInput,
};
use crate::models::{
    Company, Customer, Expense, Invoice, InvoiceLineItem, InvoiceStatus, User,
};
use crate::services::numbering::next_invoice_number;
use anyhow::Result;
use chrono::{Duration, Utc};
use dashmap::DashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Owner id used when no authenticated identity is attached to a request.
pub const DEMO_USER_ID: &str = "demo-user";

#[derive(Clone)]
pub struct LedgerStore {
    users: Arc<DashMap<String, User>>,
    /// Keyed by owning user id; the map shape itself enforces at most one
    /// company per user.
    companies: Arc<DashMap<String, Company>>,
    customers: Arc<DashMap<Uuid, Customer>>,
    invoices: Arc<DashMap<Uuid, Invoice>>,
    expenses: Arc<DashMap<Uuid, Expense>>,
    invoice_create_lock: Arc<Mutex<()>>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(DashMap::new()),
            companies: Arc::new(DashMap::new()),
            customers: Arc::new(DashMap::new()),
            invoices: Arc::new(DashMap::new()),
            expenses: Arc::new(DashMap::new()),
            invoice_create_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Load the demo fixtures: a demo owner with a 14% / "PF" company, two
    /// customers, a seeded PF-001 invoice, and two expenses.
    pub async fn seed_demo(&self) -> Result<()> {
        let today = Utc::now().date_naive();

        self.users.insert(
            DEMO_USER_ID.to_string(),
            User {
                id: DEMO_USER_ID.to_string(),
                email: "owner@pulaflow.example".to_string(),
                password: "demo".to_string(),
                phone_number: "+26770000000".to_string(),
            },
        );

        self.companies.insert(
            DEMO_USER_ID.to_string(),
            Company {
                id: Uuid::new_v4(),
                user_id: DEMO_USER_ID.to_string(),
                company_name: String::new(),
                address: String::new(),
                contact_phone: String::new(),
                registration_number: String::new(),
                default_tax_rate: 14.0,
                invoice_prefix: "PF".to_string(),
            },
        );

        let kalahari = Customer {
            id: Uuid::new_v4(),
            user_id: DEMO_USER_ID.to_string(),
            name: "Kalahari Supplies".to_string(),
            email: "accounts@kalahari.co.bw".to_string(),
            phone_number: "+26773000000".to_string(),
        };
        let okavango = Customer {
            id: Uuid::new_v4(),
            user_id: DEMO_USER_ID.to_string(),
            name: "Okavango Outfitters".to_string(),
            email: "finance@okavango.bw".to_string(),
            phone_number: "+26774000000".to_string(),
        };
        self.customers.insert(kalahari.id, kalahari.clone());
        self.customers.insert(okavango.id, okavango);

        let invoice = Invoice {
            id: Uuid::new_v4(),
            customer_id: kalahari.id,
            invoice_number: "PF-001".to_string(),
            issue_date: today,
            due_date: today + Duration::days(7),
            status: InvoiceStatus::Draft,
            line_items: vec![
                InvoiceLineItem {
                    id: Uuid::new_v4(),
                    description: "Consulting - Setup".to_string(),
                    quantity: 1.0,
                    unit_price: 1500.0,
                },
                InvoiceLineItem {
                    id: Uuid::new_v4(),
                    description: "Support - Month 1".to_string(),
                    quantity: 1.0,
                    unit_price: 600.0,
                },
            ],
            tax_rate_applied: 14.0,
        };
        self.invoices.insert(invoice.id, invoice);

        for (description, amount, category) in [
            ("Fuel - client meeting", 250.25, "Transport"),
            ("Data bundle", 120.0, "Utilities"),
        ] {
            let expense = Expense {
                id: Uuid::new_v4(),
                user_id: DEMO_USER_ID.to_string(),
                description: description.to_string(),
                amount,
                category: category.to_string(),
                receipt_url: String::new(),
                date: today,
            };
            self.expenses.insert(expense.id, expense);
        }

        tracing::info!("Demo fixtures loaded into ledger store");
        Ok(())
    }

    // ---- users ----

    pub async fn create_user(&self, email: &str, password: &str, phone: &str) -> Result<User> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            password: password.to_string(),
            phone_number: phone.to_string(),
        };
        self.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.clone()))
    }

    // ---- company ----

    pub async fn get_company(&self, user_id: &str) -> Result<Option<Company>> {
        Ok(self.companies.get(user_id).map(|c| c.clone()))
    }

    /// Apply a partial patch to the user's company, creating it with the
    /// default profile first if this is the first settings write.
    pub async fn patch_company(&self, user_id: &str, patch: CompanyPatch) -> Result<Company> {
        let mut company = self
            .companies
            .entry(user_id.to_string())
            .or_insert_with(|| Company {
                id: Uuid::new_v4(),
                user_id: user_id.to_string(),
                company_name: String::new(),
                address: String::new(),
                contact_phone: String::new(),
                registration_number: String::new(),
                default_tax_rate: 0.0,
                invoice_prefix: "INV".to_string(),
            });

        if let Some(name) = patch.company_name {
            company.company_name = name;
        }
        if let Some(address) = patch.address {
            company.address = address;
        }
        if let Some(phone) = patch.contact_phone {
            company.contact_phone = phone;
        }
        if let Some(reg) = patch.registration_number {
            company.registration_number = reg;
        }
        if let Some(rate) = patch.default_tax_rate {
            company.default_tax_rate = rate;
        }
        if let Some(prefix) = patch.invoice_prefix {
            company.invoice_prefix = prefix;
        }

        Ok(company.clone())
    }

    // ---- customers ----

    pub async fn list_customers(&self, user_id: &str) -> Result<Vec<Customer>> {
        let mut rows: Vec<Customer> = self
            .customers
            .iter()
            .filter(|c| c.user_id == user_id)
            .map(|c| c.clone())
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    pub async fn get_customer(&self, id: Uuid) -> Result<Option<Customer>> {
        Ok(self.customers.get(&id).map(|c| c.clone()))
    }

    pub async fn create_customer(
        &self,
        user_id: &str,
        data: CreateCustomerRequest,
    ) -> Result<Customer> {
        let customer = Customer {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            name: data.name,
            email: data.email.unwrap_or_default(),
            phone_number: data.phone_number.unwrap_or_default(),
        };
        self.customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    pub async fn update_customer(
        &self,
        id: Uuid,
        patch: CustomerPatch,
    ) -> Result<Option<Customer>> {
        let Some(mut customer) = self.customers.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            customer.name = name;
        }
        if let Some(email) = patch.email {
            customer.email = email;
        }
        if let Some(phone) = patch.phone_number {
            customer.phone_number = phone;
        }
        Ok(Some(customer.clone()))
    }

    /// Deleting a customer leaves their invoices in place with a dangling
    /// customer reference — an accepted simplification.
    pub async fn delete_customer(&self, id: Uuid) -> Result<bool> {
        Ok(self.customers.remove(&id).is_some())
    }

    // ---- invoices ----

    /// Invoices belong to a user transitively through their customer, so
    /// the listing is scoped by customer ownership. Orphaned invoices
    /// (customer deleted) drop out of the listing but stay fetchable by id.
    pub async fn list_invoices(&self, user_id: &str) -> Result<Vec<(Invoice, Option<Customer>)>> {
        let owned: std::collections::HashMap<Uuid, Customer> = self
            .customers
            .iter()
            .filter(|c| c.user_id == user_id)
            .map(|c| (c.id, c.clone()))
            .collect();

        let mut rows: Vec<(Invoice, Option<Customer>)> = self
            .invoices
            .iter()
            .filter(|inv| owned.contains_key(&inv.customer_id))
            .map(|inv| {
                let customer = owned.get(&inv.customer_id).cloned();
                (inv.clone(), customer)
            })
            .collect();
        rows.sort_by(|a, b| b.0.invoice_number.cmp(&a.0.invoice_number));
        Ok(rows)
    }

    pub async fn get_invoice(&self, id: Uuid) -> Result<Option<(Invoice, Option<Customer>)>> {
        let Some(invoice) = self.invoices.get(&id).map(|i| i.clone()) else {
            return Ok(None);
        };
        let customer = self.customers.get(&invoice.customer_id).map(|c| c.clone());
        Ok(Some((invoice, customer)))
    }

    /// Numbers in use under `prefix`, for allocation and for diagnostics.
    pub async fn list_invoice_numbers(&self, prefix: &str) -> Result<Vec<String>> {
        let marker = format!("{prefix}-");
        Ok(self
            .invoices
            .iter()
            .map(|inv| inv.invoice_number.clone())
            .filter(|n| n.starts_with(&marker))
            .collect())
    }

    pub async fn create_invoice(
        &self,
        user_id: &str,
        data: CreateInvoiceRequest,
    ) -> Result<Invoice> {
        let company = self.get_company(user_id).await?;
        let prefix = company
            .as_ref()
            .map(|c| c.invoice_prefix.clone())
            .unwrap_or_else(|| "INV".to_string());
        let tax_rate = data
            .tax_rate_applied
            .or(company.map(|c| c.default_tax_rate))
            .unwrap_or(0.0);

        let line_items = data.line_items.into_iter().map(materialize_line_item).collect();

        // Allocation reads the numbers already in use, so it must not
        // interleave with another creation's insert.
        let guard = self
            .invoice_create_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let existing: Vec<String> = self
            .invoices
            .iter()
            .map(|inv| inv.invoice_number.clone())
            .collect();
        let invoice_number = next_invoice_number(&prefix, &existing);

        let invoice = Invoice {
            id: Uuid::new_v4(),
            customer_id: data.customer_id,
            invoice_number,
            issue_date: data.issue_date,
            due_date: data.due_date,
            status: InvoiceStatus::Draft,
            line_items,
            tax_rate_applied: tax_rate,
        };
        self.invoices.insert(invoice.id, invoice.clone());
        drop(guard);

        Ok(invoice)
    }

    pub async fn update_invoice(&self, id: Uuid, patch: InvoicePatch) -> Result<Option<Invoice>> {
        let Some(mut invoice) = self.invoices.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(issue_date) = patch.issue_date {
            invoice.issue_date = issue_date;
        }
        if let Some(due_date) = patch.due_date {
            invoice.due_date = due_date;
        }
        if let Some(items) = patch.line_items {
            invoice.line_items = items.into_iter().map(materialize_line_item).collect();
        }
        if let Some(rate) = patch.tax_rate_applied {
            invoice.tax_rate_applied = rate;
        }
        if let Some(status) = patch.status {
            transition(&mut invoice, status);
        }
        Ok(Some(invoice.clone()))
    }

    /// The single transition point for invoice status, shared by explicit
    /// user action and the webhook reconciler.
    pub async fn update_invoice_status(
        &self,
        id: Uuid,
        status: InvoiceStatus,
    ) -> Result<Option<Invoice>> {
        let Some(mut invoice) = self.invoices.get_mut(&id) else {
            return Ok(None);
        };
        transition(&mut invoice, status);
        Ok(Some(invoice.clone()))
    }

    pub async fn delete_invoice(&self, id: Uuid) -> Result<bool> {
        Ok(self.invoices.remove(&id).is_some())
    }

    // ---- expenses ----

    pub async fn list_expenses(&self, user_id: &str) -> Result<Vec<Expense>> {
        let mut rows: Vec<Expense> = self
            .expenses
            .iter()
            .filter(|e| e.user_id == user_id)
            .map(|e| e.clone())
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }

    pub async fn create_expense(
        &self,
        user_id: &str,
        data: CreateExpenseRequest,
    ) -> Result<Expense> {
        let expense = Expense {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            description: data.description,
            amount: data.amount,
            category: data.category.unwrap_or_else(|| "General".to_string()),
            receipt_url: data.receipt_url.unwrap_or_default(),
            date: data.date.unwrap_or_else(|| Utc::now().date_naive()),
        };
        self.expenses.insert(expense.id, expense.clone());
        Ok(expense)
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

fn materialize_line_item(input: LineItemInput) -> InvoiceLineItem {
    InvoiceLineItem {
        id: Uuid::new_v4(),
        description: input.description,
        quantity: input.quantity,
        unit_price: input.unit_price,
    }
}

/// Apply a status change. Any state may currently move to any other; a
/// stricter transition table (e.g. no regression out of `Paid` without an
/// administrative override) would be enforced here and nowhere else.
fn transition(invoice: &mut Invoice, next: InvoiceStatus) {
    if invoice.status != next {
        tracing::info!(
            invoice_number = %invoice.invoice_number,
            from = ?invoice.status,
            to = ?next,
            "Invoice status transition"
        );
        invoice.status = next;
    }
}
