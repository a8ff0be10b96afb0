// Company Top-ups
// Groups validated users by company and credits each company's top-up

use crate::models::{Company, User};

use std::collections::BTreeMap;

/// A user after the top-up has been applied
#[derive(Debug, Clone, PartialEq)]
pub struct TopUpEntry {
    pub user: User,
    /// Balance before this run
    pub previous_tokens: f64,
}

impl TopUpEntry {
    pub fn new_tokens(&self) -> f64 {
        self.user.tokens
    }

    pub fn credited(&self) -> f64 {
        self.user.tokens - self.previous_tokens
    }
}

/// Top-up results for a single company
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyTopUp {
    pub company: Company,
    /// Users with `email_status` set, in input order
    pub emailed: Vec<TopUpEntry>,
    /// Active users without `email_status`, in input order
    pub not_emailed: Vec<TopUpEntry>,
}

impl CompanyTopUp {
    /// Reported total: the raw company top-up times the number of emailed,
    /// active users. Not-emailed credits are not part of this figure.
    pub fn reported_total(&self) -> f64 {
        let emailed_active = self
            .emailed
            .iter()
            .filter(|entry| entry.user.active_status)
            .count();
        self.company.top_up * emailed_active as f64
    }

    /// Sum of what was actually credited across both segments
    pub fn credited_total(&self) -> f64 {
        self.emailed
            .iter()
            .chain(&self.not_emailed)
            .map(TopUpEntry::credited)
            .sum()
    }

    pub fn user_count(&self) -> usize {
        self.emailed.len() + self.not_emailed.len()
    }
}

/// Bucket users by `company_id`, preserving input order within each bucket
pub fn group_by_company(users: Vec<User>) -> BTreeMap<i64, Vec<User>> {
    let mut groups: BTreeMap<i64, Vec<User>> = BTreeMap::new();
    for user in users {
        groups.entry(user.company_id).or_default().push(user);
    }
    groups
}

/// Apply every company's top-up to its users
///
/// Companies come back sorted by id (stable, so duplicate ids keep their
/// input order). Each company works on its own copy of its users; users whose
/// `email_status` and `active_status` are both false appear in neither
/// segment.
pub fn apply_top_ups(mut companies: Vec<Company>, users: Vec<User>) -> Vec<CompanyTopUp> {
    companies.sort_by_key(|company| company.id);
    let groups = group_by_company(users);

    companies
        .into_iter()
        .map(|company| {
            let members = groups.get(&company.id).cloned().unwrap_or_default();
            top_up_company(company, members)
        })
        .collect()
}

fn top_up_company(company: Company, members: Vec<User>) -> CompanyTopUp {
    let amount = company.effective_top_up();
    let mut emailed = Vec::new();
    let mut not_emailed = Vec::new();

    for mut user in members {
        let previous_tokens = user.tokens;
        if user.is_emailed() {
            if user.is_eligible_for_top_up() {
                user.tokens += amount;
            }
            emailed.push(TopUpEntry {
                user,
                previous_tokens,
            });
        } else if user.is_not_emailed() {
            user.tokens += amount;
            not_emailed.push(TopUpEntry {
                user,
                previous_tokens,
            });
        } else {
            tracing::debug!(
                user_id = user.id,
                company_id = company.id,
                "user is neither emailed nor active, skipping"
            );
        }
    }

    CompanyTopUp {
        company,
        emailed,
        not_emailed,
    }
}
