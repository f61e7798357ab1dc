// CV management: hand-built CVs, listing, edits and rendered downloads.
// Job-tailored CVs are created in `tailoring::handlers` under the same quota.

pub mod handlers;
