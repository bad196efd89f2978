use super::const_error;

const_error!(INTERNAL, INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "internal server error");
const_error!(REQUEST_TIMEOUT, REQUEST_TIMEOUT, "INTERNAL_ERROR", "request timed out");

const_error!(JSON_MISSING_FIELDS, BAD_REQUEST, "INVALID_REQUEST", "missing fields");
const_error!(JSON_SYNTAX_ERROR, BAD_REQUEST, "INVALID_REQUEST", "syntax error");
const_error!(
    JSON_CONTENT_TYPE,
    BAD_REQUEST,
    "INVALID_REQUEST",
    "missing or wrong content-type"
);
const_error!(JSON_VALIDATE_INVALID, BAD_REQUEST, "INVALID_REQUEST", "invalid data");
const_error!(QUERY_INVALID, BAD_REQUEST, "INVALID_REQUEST", "invalid query parameters");
const_error!(
    DUPLICATE_MEMBER,
    BAD_REQUEST,
    "INVALID_REQUEST",
    "team members must have unique ids"
);
const_error!(
    EMPTY_DEACTIVATION,
    BAD_REQUEST,
    "INVALID_REQUEST",
    "no users to deactivate"
);
const_error!(
    DEACTIVATE_ALL_MEMBERS,
    BAD_REQUEST,
    "INVALID_REQUEST",
    "cannot deactivate every member of a team"
);
const_error!(
    NOT_A_TEAM_MEMBER,
    BAD_REQUEST,
    "INVALID_REQUEST",
    "user is not a member of the team"
);

const_error!(TEAM_EXISTS, BAD_REQUEST, "TEAM_EXISTS", "team already exists");

const_error!(TEAM_NOT_FOUND, NOT_FOUND, "NOT_FOUND", "team not found");
const_error!(USER_NOT_FOUND, NOT_FOUND, "NOT_FOUND", "user not found");
const_error!(AUTHOR_NOT_FOUND, NOT_FOUND, "NOT_FOUND", "author not found");
const_error!(PR_NOT_FOUND, NOT_FOUND, "NOT_FOUND", "pull request not found");

const_error!(PR_EXISTS, CONFLICT, "PR_EXISTS", "pull request already exists");
const_error!(PR_MERGED, CONFLICT, "PR_MERGED", "pull request is already merged");
const_error!(
    NOT_ASSIGNED,
    CONFLICT,
    "NOT_ASSIGNED",
    "reviewer is not assigned to this pull request"
);
const_error!(
    NO_REPLACEMENT_CANDIDATE,
    CONFLICT,
    "NO_CANDIDATE",
    "no active replacement candidate in team"
);
const_error!(
    NO_CANDIDATE,
    BAD_REQUEST,
    "NO_CANDIDATE",
    "pull request would be left without reviewers"
);
