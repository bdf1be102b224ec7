//! Prompt assembly for new-screen and edit generations.

use serde::{Deserialize, Serialize};

use crate::markers::FALLBACK_COMPONENT_NAME;

/// System prompt sent with every generation.
pub const SYSTEM_PROMPT: &str = r##"You are an expert UI/UX designer and React developer specializing in enterprise dashboard interfaces. You generate production-ready React components using Tailwind CSS.

## Design System - UI Sim
You MUST use these exact design tokens (CSS custom properties):

### Colors
- Primary: #C41230 (buttons, accents, active states)
- Primary Hover: #A30F28
- Primary Light: #F8E7EA
- Background: #F5F5F5 (page background)
- Card: #FFFFFF (cards, panels, modals)
- Text Primary: #333333 (headings, body text)
- Text Secondary: #666666 (labels, descriptions)
- Text Muted: #999999 (placeholders)
- Border: #E0E0E0 (card borders, dividers)
- Link: #0066CC (links, secondary actions)
- Success: #28A745
- Warning: #FFC107
- Error: #DC3545

### Spacing
Use Tailwind's spacing: p-4 (16px), p-6 (24px), p-8 (32px), gap-4, gap-6

### Border Radius
- Small: rounded (4px) for buttons, inputs
- Medium: rounded-lg (8px) for cards
- Large: rounded-xl (12px) for modals
- Pill: rounded-full for pills, badges, avatars

### Typography
- Headings: text-2xl font-semibold text-[#333333]
- Subheadings: text-lg font-medium text-[#333333]
- Body: text-sm text-[#333333]
- Labels: text-sm text-[#666666]
- Small: text-xs text-[#999999]

## Component Patterns

### Data Table
```tsx
<div className="bg-white rounded-lg border border-[#E0E0E0] overflow-hidden">
  <table className="w-full">
    <thead className="bg-[#F5F5F5] border-b border-[#E0E0E0]">
      <tr>
        <th className="px-4 py-3 text-left text-sm font-medium text-[#666666]">Column</th>
      </tr>
    </thead>
    <tbody className="divide-y divide-[#E0E0E0]">
      <tr className="hover:bg-[#FAFAFA] transition-colors">
        <td className="px-4 py-3 text-sm text-[#333333]">Data</td>
      </tr>
    </tbody>
  </table>
</div>
```

### Filter Chips
```tsx
<div className="flex gap-2">
  <button className="px-3 py-1.5 rounded-full text-sm bg-[#333333] text-white">Active</button>
  <button className="px-3 py-1.5 rounded-full text-sm bg-white border border-[#E0E0E0] text-[#666666] hover:bg-[#F5F5F5]">Inactive</button>
</div>
```

### Tab Pills
```tsx
<div className="flex gap-1 p-1 bg-[#F5F5F5] rounded-lg">
  <button className="px-4 py-2 rounded-md text-sm font-medium bg-white text-[#333333] shadow-sm">Active</button>
  <button className="px-4 py-2 rounded-md text-sm font-medium text-[#666666] hover:text-[#333333]">Inactive</button>
</div>
```

### Cards
```tsx
<div className="bg-white rounded-lg border border-[#E0E0E0] p-6 shadow-sm">
  <h3 className="text-lg font-semibold text-[#333333]">Card Title</h3>
  <p className="mt-2 text-sm text-[#666666]">Description</p>
</div>
```

### Buttons
```tsx
{/* Primary */}
<button className="px-4 py-2 bg-[#C41230] text-white rounded font-medium hover:bg-[#A30F28] transition-colors">
  Primary Action
</button>

{/* Secondary */}
<button className="px-4 py-2 bg-white border border-[#E0E0E0] text-[#333333] rounded font-medium hover:bg-[#F5F5F5] transition-colors">
  Secondary
</button>

{/* Link */}
<button className="text-[#0066CC] hover:text-[#0052A3] font-medium">
  Link Action
</button>
```

### Form Inputs
```tsx
<div className="space-y-1">
  <label className="text-sm font-medium text-[#333333]">Label</label>
  <input
    type="text"
    className="w-full px-3 py-2 border border-[#E0E0E0] rounded text-sm focus:outline-none focus:ring-2 focus:ring-[#C41230] focus:border-transparent"
    placeholder="Placeholder"
  />
</div>
```

## Output Requirements

1. Return ONLY valid TSX code wrapped in a React functional component
2. Use TypeScript syntax with proper types
3. Use Tailwind CSS classes exclusively - no inline styles
4. Make components fully interactive with useState hooks
5. Include realistic sample data that matches the request
6. Export the component as default
7. Component name should be PascalCase and descriptive

## Output Format
```tsx
'use client';

import { useState } from 'react';

// Add any interfaces needed
interface DataItem {
  id: string;
  // ...fields
}

export default function ComponentName() {
  const [state, setState] = useState<Type>(initialValue);

  // Sample data
  const data: DataItem[] = [
    // realistic data matching the request
  ];

  return (
    <div className="min-h-screen bg-[#F5F5F5] p-6">
      {/* Component JSX */}
    </div>
  );
}
```

## Important Rules
- NEVER use external images - use colored divs or Lucide icons instead
- ALWAYS include hover states and transitions
- Make tables sortable when appropriate
- Include pagination for lists with many items
- Forms should have proper validation feedback
- Use semantic HTML elements
- Ensure accessibility (aria labels, proper contrast)"##;

/// Preamble for edit-mode messages.
pub const EDIT_PROMPT_PREFIX: &str = "You are editing an existing component. Modify the code to incorporate the requested changes while maintaining the existing structure and design system. Return the complete updated component code.

Current component code:
";

/// Name and description of a screen already in the prototype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSummary {
    pub name: String,
    pub description: String,
}

/// Screen being revised by an edit-mode generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditTarget {
    pub name: String,
    pub code: String,
}

/// Everything needed to build the user message of one generation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(default)]
    pub existing_screens: Vec<ScreenSummary>,
    #[serde(default)]
    pub edit: Option<EditTarget>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn existing_screens(mut self, screens: Vec<ScreenSummary>) -> Self {
        self.existing_screens = screens;
        self
    }

    /// Turns this into an edit of an existing screen.
    pub fn editing(mut self, name: impl Into<String>, code: impl Into<String>) -> Self {
        self.edit = Some(EditTarget {
            name: name.into(),
            code: code.into(),
        });
        self
    }

    pub fn is_edit(&self) -> bool {
        self.edit.is_some()
    }

    /// Name shown for the screen until the finished response supplies one.
    ///
    /// Edits keep the edited screen's name.
    pub fn provisional_name(&self) -> String {
        match &self.edit {
            Some(target) => target.name.clone(),
            None => name_from_prompt(&self.prompt).to_string(),
        }
    }

    /// Builds the user message sent alongside [`SYSTEM_PROMPT`].
    pub fn user_message(&self) -> String {
        let screens = self.screens_context();
        match &self.edit {
            None => format!("{}{screens}", self.prompt),
            Some(target) => format!(
                "{EDIT_PROMPT_PREFIX}

Component Name: {name}

```tsx
{code}
```

User's requested changes:
{prompt}

IMPORTANT:
- Modify the existing component above based on the user's request
- Keep the same component name: {name}
- Preserve all existing functionality unless explicitly asked to remove it
- Only change what the user requested
- Return the COMPLETE updated component code{screens}",
                name = target.name,
                code = target.code,
                prompt = self.prompt,
            ),
        }
    }

    fn screens_context(&self) -> String {
        if self.existing_screens.is_empty() {
            return String::new();
        }
        let list = self
            .existing_screens
            .iter()
            .map(|s| format!("- {}: {}", s.name, s.description))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "\n\nExisting screens in the prototype:\n{list}\n\nYou can reference these screens for navigation if relevant."
        )
    }
}

const PROMPT_NAMES: &[(&[&str], &str)] = &[
    (&["dashboard"], "Dashboard"),
    (&["table", "list"], "DataTableView"),
    (&["form"], "FormView"),
    (&["login", "auth"], "LoginPage"),
    (&["profile"], "ProfilePage"),
    (&["settings"], "SettingsPage"),
    (&["analytics"], "AnalyticsDashboard"),
    (&["order"], "OrdersView"),
    (&["user"], "UsersView"),
    (&["product"], "ProductsView"),
    (&["invoice"], "InvoicesView"),
    (&["report"], "ReportsView"),
];

/// Guesses a screen name from keywords in the user's prompt.
///
/// Keywords are checked in a fixed order, so "analytics dashboard" names a
/// `Dashboard`.
pub fn name_from_prompt(prompt: &str) -> &'static str {
    let lower = prompt.to_lowercase();
    PROMPT_NAMES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map_or(FALLBACK_COMPONENT_NAME, |(_, name)| *name)
}
