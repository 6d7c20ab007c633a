//! Registration Page
//!
//! Account creation with a role selector; each role asks for its own
//! optional business details. Business roles start unapproved.

use std::collections::BTreeMap;

use bepawa::access::Page;
use bepawa::auth::{NewIdentity, Profile, Role};
use leptos::*;
use leptos_router::*;

use crate::components::Protected;
use crate::state::{use_auth, use_notifier};

/// Roles offered on the form. Admin accounts are only ever seeded.
const SELECTABLE_ROLES: [Role; 4] = [Role::Individual, Role::Retail, Role::Wholesale, Role::Lab];

/// Optional profile inputs
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Field {
    Phone,
    Address,
    DateOfBirth,
    LicenseNumber,
    BusinessRegistration,
    TaxId,
    PharmacistInCharge,
    Specializations,
}

impl Field {
    fn for_role(role: Role) -> &'static [Field] {
        use Field::*;
        match role {
            Role::Admin => &[Phone],
            Role::Individual => &[Phone, Address, DateOfBirth],
            Role::Retail => &[Phone, Address, LicenseNumber, BusinessRegistration, PharmacistInCharge],
            Role::Wholesale => &[Phone, Address, LicenseNumber, BusinessRegistration, TaxId],
            Role::Lab => &[Phone, Address, LicenseNumber, Specializations],
        }
    }

    fn label(self) -> &'static str {
        match self {
            Field::Phone => "Phone",
            Field::Address => "Address",
            Field::DateOfBirth => "Date of birth",
            Field::LicenseNumber => "License number",
            Field::BusinessRegistration => "Business registration",
            Field::TaxId => "Tax ID (TIN)",
            Field::PharmacistInCharge => "Pharmacist in charge",
            Field::Specializations => "Specializations (comma separated)",
        }
    }

    fn input_type(self) -> &'static str {
        match self {
            Field::Phone => "tel",
            Field::DateOfBirth => "date",
            _ => "text",
        }
    }
}

/// Profile from the inputs that apply to `role`; blank inputs are left out
fn build_profile(role: Role, values: &BTreeMap<Field, String>) -> Profile {
    let mut profile = Profile::default();

    for field in Field::for_role(role) {
        let value = match values.get(field).map(|v| v.trim()) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => continue,
        };

        match field {
            Field::Phone => profile.phone = Some(value),
            Field::Address => profile.address = Some(value),
            Field::DateOfBirth => profile.date_of_birth = Some(value),
            Field::LicenseNumber => profile.license_number = Some(value),
            Field::BusinessRegistration => profile.business_registration = Some(value),
            Field::TaxId => profile.tax_id = Some(value),
            Field::PharmacistInCharge => profile.pharmacist_in_charge = Some(value),
            Field::Specializations => {
                profile.specializations = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            }
        }
    }

    profile
}

const INPUT_CLASS: &str = "w-full bg-gray-700 rounded-lg px-4 py-2 text-white focus:outline-none focus:ring-2 focus:ring-primary-500";

/// Registration form
#[component]
pub fn Register() -> impl IntoView {
    let auth = use_auth();
    let notify = use_notifier();
    let navigate = use_navigate();

    let (email, set_email) = create_signal(String::new());
    let (name, set_name) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (confirm, set_confirm) = create_signal(String::new());
    let role = create_rw_signal(Role::Individual);
    let details = create_rw_signal(BTreeMap::<Field, String>::new());

    let busy = auth.busy;
    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();

        if password.get_untracked() != confirm.get_untracked() {
            notify.error("Passwords do not match");
            return;
        }

        let role = role.get_untracked();
        let input = NewIdentity::new(email.get_untracked(), role, password.get_untracked())
            .name(name.get_untracked().trim())
            .profile(details.with_untracked(|values| build_profile(role, values)));

        match auth.register(input) {
            Ok(identity) if identity.is_approved => {
                notify.success("Registration successful. You can now sign in.");
                navigate(&Page::Login.path(), Default::default());
            }
            Ok(_) => {
                notify.success("Registration received. Your account is pending approval.");
                navigate(&Page::Login.path(), Default::default());
            }
            Err(e) => notify.error(e.to_string()),
        }
    };

    view! {
        <Protected page=Page::Register>
            <div class="max-w-lg mx-auto space-y-8">
                <div class="text-center">
                    <h1 class="text-3xl font-bold">"Create an account"</h1>
                    <p class="text-gray-400 mt-1">
                        "Pharmacies, wholesalers and laboratories are reviewed before they can sign in"
                    </p>
                </div>

                <form on:submit=on_submit.clone() class="bg-gray-800 rounded-xl p-6 space-y-4">
                    <div>
                        <label class="block text-sm text-gray-400 mb-1">"Account type"</label>
                        <select
                            class=INPUT_CLASS
                            on:change=move |ev| {
                                if let Ok(selected) = event_target_value(&ev).parse::<Role>() {
                                    role.set(selected);
                                }
                            }
                        >
                            {SELECTABLE_ROLES.into_iter().map(|r| view! {
                                <option value=r.as_str() selected=move || role.get() == r>
                                    {r.label()}
                                </option>
                            }).collect_view()}
                        </select>
                    </div>

                    <TextInput label="Name" kind="text" value=name set_value=set_name />
                    <TextInput label="Email" kind="email" value=email set_value=set_email required=true />
                    <TextInput label="Password" kind="password" value=password set_value=set_password required=true />
                    <TextInput label="Confirm password" kind="password" value=confirm set_value=set_confirm required=true />

                    // Role-specific details
                    {move || {
                        Field::for_role(role.get()).iter().map(|&field| view! {
                            <div>
                                <label class="block text-sm text-gray-400 mb-1">{field.label()}</label>
                                <input
                                    type=field.input_type()
                                    class=INPUT_CLASS
                                    prop:value=move || details.with(|d| d.get(&field).cloned().unwrap_or_default())
                                    on:input=move |ev| {
                                        let value = event_target_value(&ev);
                                        details.update(|d| { d.insert(field, value); });
                                    }
                                />
                            </div>
                        }).collect_view()
                    }}

                    <button
                        type="submit"
                        disabled=move || busy.get()
                        class="w-full py-3 bg-primary-600 hover:bg-primary-700 disabled:opacity-50 rounded-lg font-medium transition-colors"
                    >
                        "Register"
                    </button>
                    <p class="text-sm text-gray-400 text-center">
                        "Already registered? "
                        <A href="/login" class="text-primary-400 hover:underline">"Sign in"</A>
                    </p>
                </form>
            </div>
        </Protected>
    }
}

#[component]
fn TextInput(
    label: &'static str,
    kind: &'static str,
    value: ReadSignal<String>,
    set_value: WriteSignal<String>,
    #[prop(optional)]
    required: bool,
) -> impl IntoView {
    view! {
        <div>
            <label class="block text-sm text-gray-400 mb-1">{label}</label>
            <input
                type=kind
                required=required
                class=INPUT_CLASS
                prop:value=value
                on:input=move |ev| set_value.set(event_target_value(&ev))
            />
        </div>
    }
}
