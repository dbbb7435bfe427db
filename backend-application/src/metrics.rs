use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    openings: AtomicU64,
    openings_rejected: AtomicU64,
    invalid_cases: AtomicU64,
    integrity_fallbacks: AtomicU64,
    items_sold: AtomicU64,
    items_upgraded: AtomicU64,
    registrations: AtomicU64,
    logins: AtomicU64,
    audit_errors: AtomicU64,
}

impl Metrics {
    pub fn record_opening(&self) {
        self.openings.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_opening_rejected(&self) {
        self.openings_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalid_case(&self) {
        self.invalid_cases.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_integrity_fallback(&self) {
        self.integrity_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_item_sold(&self) {
        self.items_sold.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_item_upgraded(&self) {
        self.items_upgraded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_registration(&self) {
        self.registrations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_login(&self) {
        self.logins.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_audit_error(&self) {
        self.audit_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn openings(&self) -> u64 {
        self.openings.load(Ordering::Relaxed)
    }

    pub fn openings_rejected(&self) -> u64 {
        self.openings_rejected.load(Ordering::Relaxed)
    }

    pub fn integrity_fallbacks(&self) -> u64 {
        self.integrity_fallbacks.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let counters = [
            ("caseforge_openings_total", &self.openings),
            ("caseforge_openings_rejected_total", &self.openings_rejected),
            ("caseforge_invalid_cases_total", &self.invalid_cases),
            ("caseforge_integrity_fallbacks_total", &self.integrity_fallbacks),
            ("caseforge_items_sold_total", &self.items_sold),
            ("caseforge_items_upgraded_total", &self.items_upgraded),
            ("caseforge_registrations_total", &self.registrations),
            ("caseforge_logins_total", &self.logins),
            ("caseforge_audit_errors_total", &self.audit_errors),
        ];

        let mut out = String::new();
        for (name, counter) in counters {
            out.push_str(&format!(
                "# TYPE {name} counter\n{name} {}\n",
                counter.load(Ordering::Relaxed)
            ));
        }
        out
    }
}
