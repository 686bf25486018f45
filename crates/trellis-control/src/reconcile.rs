//! Domain/trigger reconciliation.
//!
//! Turns the user's declared domains or triggers into the trigger list that
//! is submitted for deployment, carrying the previously assigned automatic
//! domain forward when the function identity is unchanged and reissuing it
//! when it changed.
//!
//! A function can hold at most one automatically assigned domain. Every
//! binding that is the `Auto` placeholder or a platform-generated hostname
//! counts towards that limit, and the second one aborts reconciliation with
//! [`ConfigConflict::MultipleAutoDomains`].

use tracing::debug;

use crate::domain::AutoDomainMatcher;
use crate::error::{ConfigConflict, DeployResult};
use crate::types::{is_sentinel, DomainBinding, Trigger, TriggerType, AUTO_DOMAIN};

/// Everything the reconciler needs to know about one deployment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconciliationInput {
    /// Domains declared at the top level of the user configuration.
    pub desired_domains: Option<Vec<DomainBinding>>,
    /// Triggers declared explicitly by the user.
    pub desired_triggers: Option<Vec<Trigger>>,
    /// Automatic domain recorded by the previous deployment.
    pub previous_auto_domain: Option<String>,
    /// Whether region, service name or function name changed.
    pub identity_changed: bool,
}

/// Counts automatic bindings and rejects the second one.
#[derive(Debug, Default)]
struct AutoDomainBudget {
    seen: usize,
}

impl AutoDomainBudget {
    fn record(&mut self, trigger: &str) -> Result<(), ConfigConflict> {
        self.seen += 1;
        if self.seen >= 2 {
            return Err(ConfigConflict::MultipleAutoDomains {
                trigger: trigger.to_owned(),
            });
        }
        Ok(())
    }
}

/// Reconciles desired triggers and domains against recorded state.
#[derive(Debug, Clone, Copy)]
pub struct Reconciler<'a> {
    matcher: &'a dyn AutoDomainMatcher,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler that recognises automatic domains with `matcher`.
    #[must_use]
    pub const fn new(matcher: &'a dyn AutoDomainMatcher) -> Self {
        Self { matcher }
    }

    /// Produce the trigger list to submit.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigConflict::DomainsWithTriggers`] when both domains and
    /// triggers are declared, and [`ConfigConflict::MultipleAutoDomains`]
    /// when more than one binding would receive an automatic domain.
    pub fn reconcile(&self, input: ReconciliationInput) -> DeployResult<Vec<Trigger>> {
        let domains = input.desired_domains.filter(|d| !d.is_empty());
        let triggers = input.desired_triggers.filter(|t| !t.is_empty());

        match (domains, triggers) {
            (Some(_), Some(_)) => Err(ConfigConflict::DomainsWithTriggers.into()),
            (domains, None) => self.default_trigger(domains, input.previous_auto_domain),
            (None, Some(triggers)) => self.rewrite_triggers(
                triggers,
                input.previous_auto_domain.as_deref(),
                input.identity_changed,
            ),
        }
    }

    fn is_automatic(&self, domain: &str) -> bool {
        is_sentinel(domain) || self.matcher.is_auto_domain(domain)
    }

    fn default_trigger(
        &self,
        domains: Option<Vec<DomainBinding>>,
        previous_auto_domain: Option<String>,
    ) -> DeployResult<Vec<Trigger>> {
        let domains = domains.unwrap_or_else(|| {
            let domain = previous_auto_domain.unwrap_or_else(|| AUTO_DOMAIN.to_owned());
            vec![DomainBinding::with_default_route(domain)]
        });

        let trigger = Trigger::default_http(domains);

        let mut budget = AutoDomainBudget::default();
        for domain in trigger.domain_names() {
            if self.is_automatic(domain) {
                budget.record(&trigger.name)?;
            }
        }

        Ok(vec![trigger])
    }

    fn rewrite_triggers(
        &self,
        mut triggers: Vec<Trigger>,
        previous_auto_domain: Option<&str>,
        identity_changed: bool,
    ) -> DeployResult<Vec<Trigger>> {
        let mut budget = AutoDomainBudget::default();

        for trigger in &mut triggers {
            if trigger.trigger_type != TriggerType::Http {
                debug!(trigger = %trigger.name, "coercing trigger type to HTTP");
                trigger.trigger_type = TriggerType::Http;
            }

            for binding in &mut trigger.parameters.domains {
                let counted = self.rewrite_binding(binding, previous_auto_domain, identity_changed);
                if counted {
                    budget.record(&trigger.name)?;
                }
            }
        }

        Ok(triggers)
    }

    /// Apply the rewrite rules to one binding and report whether it holds an
    /// automatic domain afterwards.
    ///
    /// Counting is stricter than the rewrite rules alone: a binding reissued
    /// as `Auto` after an identity change, and an `Auto` binding that was not
    /// resolved, both count. Every accepted trigger list then holds at most
    /// one automatic domain.
    fn rewrite_binding(
        &self,
        binding: &mut DomainBinding,
        previous_auto_domain: Option<&str>,
        identity_changed: bool,
    ) -> bool {
        if identity_changed && previous_auto_domain == Some(binding.domain.as_str()) {
            debug!(domain = %binding.domain, "identity changed, reissuing automatic domain");
            binding.domain = AUTO_DOMAIN.to_owned();
            return true;
        }

        if !identity_changed && binding.is_sentinel() {
            if let Some(previous) = previous_auto_domain {
                debug!(domain = %previous, "reusing previously assigned domain");
                binding.domain = previous.to_owned();
            }
            return true;
        }

        self.is_automatic(&binding.domain)
    }
}
