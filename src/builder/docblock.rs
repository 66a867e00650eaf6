/// Documentation block attached to a unit, property or method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocblockBuilder {
    texts: Vec<String>,
    annotations: Vec<(String, String)>,
    params: Vec<(String, String)>,
    returns: Option<String>,
}

impl DocblockBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.texts.push(text.into());
        self
    }

    pub fn add_annotation(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.annotations.push((name.into(), value.into()));
        self
    }

    pub fn add_param(&mut self, name: impl Into<String>, type_hint: impl Into<String>) -> &mut Self {
        self.params.push((name.into(), type_hint.into()));
        self
    }

    pub fn set_return(&mut self, type_hint: impl Into<String>) -> &mut Self {
        self.returns = Some(type_hint.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
            && self.annotations.is_empty()
            && self.params.is_empty()
            && self.returns.is_none()
    }

    /// Free text first, then annotations, params and the return tag,
    /// separated from the text by one empty comment line.
    pub fn render_lines(&self) -> Vec<String> {
        if self.is_empty() {
            return Vec::new();
        }

        let mut tags: Vec<String> = self
            .annotations
            .iter()
            .map(|(name, value)| format!("@{name} {value}"))
            .collect();
        tags.extend(
            self.params
                .iter()
                .map(|(name, type_hint)| format!("@param {type_hint} ${name}")),
        );
        if let Some(returns) = &self.returns {
            tags.push(format!("@return {returns}"));
        }

        let mut lines = vec!["/**".to_string()];
        lines.extend(self.texts.iter().flat_map(|text| text.lines()).map(|line| format!(" * {line}")));
        if !self.texts.is_empty() && !tags.is_empty() {
            lines.push(" *".to_string());
        }
        lines.extend(tags.into_iter().map(|tag| format!(" * {tag}")));
        lines.push(" */".to_string());
        lines
    }
}
