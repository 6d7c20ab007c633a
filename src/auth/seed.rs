//! Demo accounts written to an empty directory on first start

use chrono::Utc;

use super::error::AuthResult;
use super::password::CredentialHasher;
use super::types::{IdentityRecord, Profile, Role};

/// A demo account with its plaintext password, before hashing
#[derive(Debug, Clone, Copy)]
pub struct DemoAccount {
    pub id: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub name: &'static str,
    pub role: Role,
}

/// One approved account per role
pub const DEMO_ACCOUNTS: [DemoAccount; 5] = [
    DemoAccount {
        id: "1",
        email: "admin@bepawa.com",
        password: "admin123",
        name: "Admin User",
        role: Role::Admin,
    },
    DemoAccount {
        id: "2",
        email: "individual@bepawa.com",
        password: "individual123",
        name: "John Doe",
        role: Role::Individual,
    },
    DemoAccount {
        id: "3",
        email: "retail@bepawa.com",
        password: "retail123",
        name: "City Pharmacy",
        role: Role::Retail,
    },
    DemoAccount {
        id: "4",
        email: "wholesale@bepawa.com",
        password: "wholesale123",
        name: "MedSupply Wholesale",
        role: Role::Wholesale,
    },
    DemoAccount {
        id: "5",
        email: "lab@bepawa.com",
        password: "lab123",
        name: "HealthCheck Diagnostics",
        role: Role::Lab,
    },
];

fn demo_profile(role: Role) -> Profile {
    match role {
        Role::Admin => Profile::default(),
        Role::Individual => Profile {
            phone: Some("+255 712 000 001".to_string()),
            address: Some("Dar es Salaam".to_string()),
            ..Default::default()
        },
        Role::Retail => Profile {
            phone: Some("+255 712 000 002".to_string()),
            address: Some("Kariakoo, Dar es Salaam".to_string()),
            license_number: Some("PH-2024-0001".to_string()),
            business_registration: Some("BRN-100234".to_string()),
            pharmacist_in_charge: Some("Dr. Amina Said".to_string()),
            ..Default::default()
        },
        Role::Wholesale => Profile {
            phone: Some("+255 712 000 003".to_string()),
            address: Some("Industrial Area, Arusha".to_string()),
            license_number: Some("WS-2024-0001".to_string()),
            business_registration: Some("BRN-200871".to_string()),
            tax_id: Some("TIN-118-442-090".to_string()),
            ..Default::default()
        },
        Role::Lab => Profile {
            phone: Some("+255 712 000 004".to_string()),
            address: Some("Upanga, Dar es Salaam".to_string()),
            license_number: Some("LAB-2024-0001".to_string()),
            specializations: vec![
                "Hematology".to_string(),
                "Clinical Chemistry".to_string(),
                "Microbiology".to_string(),
            ],
            ..Default::default()
        },
    }
}

/// Build the demo records, hashing each password
pub fn demo_records(hasher: &CredentialHasher) -> AuthResult<Vec<IdentityRecord>> {
    let now = Utc::now();

    DEMO_ACCOUNTS
        .iter()
        .map(|account| {
            Ok(IdentityRecord {
                id: account.id.to_string(),
                email: account.email.to_string(),
                name: account.name.to_string(),
                role: account.role,
                password_hash: hasher.hash(account.password)?,
                is_approved: true,
                created_at: now,
                profile: demo_profile(account.role),
            })
        })
        .collect()
}
