use super::{ExtractionMethod, Survey};
use crate::error::{GravError, GravResult};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry key. The same name may be registered once per method.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurveyKey {
    pub name: String,
    pub method: ExtractionMethod,
}

#[derive(Default)]
pub struct SurveyRegistry {
    surveys: HashMap<SurveyKey, Arc<Survey>>,
}

impl SurveyRegistry {
    /// Store `survey`, replacing any entry with the same name and method.
    pub fn insert(&mut self, survey: Survey) -> Arc<Survey> {
        let key = SurveyKey {
            name: survey.name().to_string(),
            method: survey.method(),
        };
        let survey = Arc::new(survey);
        self.surveys.insert(key, Arc::clone(&survey));
        survey
    }

    pub fn get(&self, name: &str, method: ExtractionMethod) -> Option<Arc<Survey>> {
        self.surveys
            .get(&SurveyKey {
                name: name.to_string(),
                method,
            })
            .cloned()
    }

    pub fn remove(&mut self, name: &str, method: ExtractionMethod) -> Option<Arc<Survey>> {
        self.surveys.remove(&SurveyKey {
            name: name.to_string(),
            method,
        })
    }

    /// Methods under which `name` is registered, in declaration order.
    pub fn methods_for(&self, name: &str) -> Vec<ExtractionMethod> {
        ExtractionMethod::ALL
            .into_iter()
            .filter(|m| {
                self.surveys.contains_key(&SurveyKey {
                    name: name.to_string(),
                    method: *m,
                })
            })
            .collect()
    }

    /// All keys, sorted by name then method.
    pub fn keys(&self) -> Vec<SurveyKey> {
        let mut keys: Vec<SurveyKey> = self.surveys.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.surveys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surveys.is_empty()
    }

    /// Look up a base/monitor pair that shares one extraction method.
    ///
    /// With `method` given, both names must exist under it. Without it, the
    /// two names must share exactly one method.
    pub fn resolve_pair(
        &self,
        base: &str,
        monitor: &str,
        method: Option<ExtractionMethod>,
    ) -> GravResult<(Arc<Survey>, Arc<Survey>)> {
        let method = match method {
            Some(method) => method,
            None => self.shared_method(base, monitor)?,
        };

        let unknown = |name: &str| GravError::UnknownSurvey {
            name: name.to_string(),
            method: Some(method),
        };
        let base_survey = self.get(base, method).ok_or_else(|| unknown(base))?;
        let monitor_survey = self.get(monitor, method).ok_or_else(|| unknown(monitor))?;

        if base_survey.cell_count() != monitor_survey.cell_count() {
            return Err(unknown(monitor));
        }
        Ok((base_survey, monitor_survey))
    }

    fn shared_method(&self, base: &str, monitor: &str) -> GravResult<ExtractionMethod> {
        let base_methods = self.methods_for(base);
        if base_methods.is_empty() {
            return Err(GravError::UnknownSurvey {
                name: base.to_string(),
                method: None,
            });
        }
        let monitor_methods = self.methods_for(monitor);
        let shared: Vec<ExtractionMethod> = base_methods
            .iter()
            .copied()
            .filter(|m| monitor_methods.contains(m))
            .collect();

        match shared.as_slice() {
            [] => Err(GravError::UnknownSurvey {
                name: monitor.to_string(),
                method: match base_methods.as_slice() {
                    [only] => Some(*only),
                    _ => None,
                },
            }),
            [method] => Ok(*method),
            _ => Err(GravError::AmbiguousSurvey {
                base: base.to_string(),
                monitor: monitor.to_string(),
                methods: shared,
            }),
        }
    }
}
